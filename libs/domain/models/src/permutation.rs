// [libs/domain/models/src/permutation.rs]
/*!
 * =================================================================
 * APARATO: PUT PERMUTATION MASK (V10.3 - POPCOUNT CERTIFIED)
 * CLASIFICACIÓN: DOMAIN FOUNDATION (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: MÁSCARA DE ORDENACIONES ADICIONALES DE ESCRITURA
 *
 * # Mathematical Proof (Response Accounting):
 * Cada bit activo de la máscara produce exactamente un PUT encolado,
 * de modo que el número de respuestas de un BPut masivo es
 * Σ popcount(permutations[i]). La contabilidad de resultados del
 * flush depende de esta igualdad.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use crate::blob::Blob;

/// Máscara de bits de las ordenaciones solicitadas para un PUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutPermutation(u32);

impl PutPermutation {
    /// (subject, predicate) → object. La ordenación canónica.
    pub const SPO: PutPermutation = PutPermutation(0b0001);
    /// (predicate, subject) → object. La ordenación inversa.
    pub const PSO: PutPermutation = PutPermutation(0b0010);
    /// (subject, object) → null.
    pub const SO: PutPermutation = PutPermutation(0b0100);
    /// (object, subject) → null.
    pub const OS: PutPermutation = PutPermutation(0b1000);

    /// Las cuatro ordenaciones a la vez.
    pub const ALL: PutPermutation = PutPermutation(0b1111);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: PutPermutation) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn union(self, other: PutPermutation) -> PutPermutation {
        PutPermutation(self.0 | other.0)
    }

    /// Número de PUTs que esta máscara encola.
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /**
     * Expande un triple en las ordenaciones (clave-sujeto, clave-predicado,
     * objeto) solicitadas, una por bit activo, etiquetando cada una con la
     * máscara unitaria que la originó.
     */
    pub fn expand(
        self,
        subject: &Blob,
        predicate: &Blob,
        object: &Blob,
    ) -> Vec<(PutPermutation, Blob, Blob, Blob)> {
        let mut orderings = Vec::with_capacity(self.popcount() as usize);

        if self.contains(Self::SPO) {
            orderings.push((Self::SPO, subject.clone(), predicate.clone(), object.clone()));
        }
        if self.contains(Self::PSO) {
            orderings.push((Self::PSO, predicate.clone(), subject.clone(), object.clone()));
        }
        if self.contains(Self::SO) {
            orderings.push((Self::SO, subject.clone(), object.clone(), Blob::null()));
        }
        if self.contains(Self::OS) {
            orderings.push((Self::OS, object.clone(), subject.clone(), Blob::null()));
        }

        orderings
    }
}

impl Default for PutPermutation {
    fn default() -> Self {
        Self::SPO
    }
}
