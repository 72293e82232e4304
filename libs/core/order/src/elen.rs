// [libs/core/order/src/elen.rs]
/*!
 * =================================================================
 * APARATO: ELEN NUMERIC CODEC (V15.2 - ALPHABET SOVEREIGN)
 * CLASIFICACIÓN: CORE ALGORITHMIC LAYER (ESTRATO L1-CORE)
 * RESPONSABILIDAD: CODIFICACIÓN LEXICOGRÁFICA EFICIENTE DE NÚMEROS
 *
 * Cuatro variantes: enteros, decimales pequeños (|x| < 1), decimales
 * grandes (mixtos) y coma flotante (mantisa/exponente). Un prefijo
 * unario codifica recursivamente el número de dígitos, haciendo la
 * codificación autodelimitada; los dígitos de los negativos se
 * complementan a nueve para que las magnitudes mayores ordenen antes.
 *
 * # Mathematical Proof (Alphabet Ordering):
 * El esquema exige un alfabeto donde neg < '0'..'9' < pos. El par
 * clásico ('+','-') sólo cumple esa desigualdad bajo un comparador a
 * medida (en ASCII '+' cae por debajo de los dígitos); el par por
 * defecto ('~','-') la cumple bajo memcmp puro, de modo que el orden
 * de bytes de las claves coincide con el orden numérico sin
 * comparadores auxiliares en el datastore.
 * =================================================================
 */

use crate::errors::ElenError;

/// Precisión por defecto para valores de origen f32 (2 × tamaño).
pub const FLOAT_PRECISION: usize = 8;
/// Precisión por defecto para valores de origen f64 (2 × tamaño).
pub const DOUBLE_PRECISION: usize = 16;

/// Par de símbolos del alfabeto ELEN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub pos: u8,
    pub neg: u8,
}

impl Symbols {
    /// Alfabeto por defecto: ordena correctamente bajo memcmp puro
    /// ('~' está por encima de los dígitos ASCII, '-' por debajo).
    pub const ORDERED: Symbols = Symbols { pos: b'~', neg: b'-' };

    /// Alfabeto histórico de los vectores publicados. Sólo ordena
    /// bajo el alfabeto del esquema, no bajo memcmp ASCII.
    pub const CLASSIC: Symbols = Symbols { pos: b'+', neg: b'-' };
}

impl Default for Symbols {
    fn default() -> Self {
        Self::ORDERED
    }
}

/// Complemento a nueve de los dígitos ASCII, in situ.
fn flip(digits: &mut [u8]) {
    for byte in digits.iter_mut() {
        if byte.is_ascii_digit() {
            *byte = b'9' - *byte + b'0';
        }
    }
}

/// Codifica una magnitud positiva con su cadena recursiva de
/// longitudes en prefijo unario.
fn encode_magnitude(magnitude: u64, prefix: u8, flip_digits: bool, out: &mut Vec<u8>) {
    out.push(prefix);

    let mut digits = magnitude.to_string().into_bytes();
    if digits.len() > 1 {
        encode_magnitude(digits.len() as u64, prefix, flip_digits, out);
    }

    if flip_digits {
        flip(&mut digits);
    }

    out.extend_from_slice(&digits);
}

// ============================================================================
// Encode
// ============================================================================

/// Capítulo 3: enteros. El cero se codifica como el byte único `0`.
pub fn encode_integers(value: i64, symbols: Symbols) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    if value < 0 {
        encode_magnitude(value.unsigned_abs(), symbols.neg, true, &mut out);
    } else {
        encode_magnitude(value as u64, symbols.pos, false, &mut out);
    }

    // el prefijo unario y los dígitos son ASCII puro
    String::from_utf8(out).expect("ASCII-only encoding")
}

/// Dígitos de la parte fraccionaria de |value| < 1, con redondeo a
/// `precision` dígitos significativos y complemento a nueve para los
/// negativos. Devuelve la cadena vacía para el cero.
fn fraction_digits(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return String::new();
    }

    let printed = format!("{}", value.abs());
    let after_dot = match printed.split_once('.') {
        Some((_, frac)) => frac.to_string(),
        // |value| < 1 sin parte decimal impresa no ocurre salvo 0
        None => return String::new(),
    };

    let leading_zeros = after_dot.len() - after_dot.trim_start_matches('0').len();
    let significant = after_dot[leading_zeros..].to_string();
    let (rounded, carry) = round_significant(&significant, precision);

    // un acarreo total sube un orden de magnitud y consume un cero inicial
    let zeros = if carry { leading_zeros.saturating_sub(1) } else { leading_zeros };
    let mut digits = format!("{}{}", "0".repeat(zeros), rounded);

    if value < 0.0 {
        let mut raw = digits.into_bytes();
        flip(&mut raw);
        digits = String::from_utf8(raw).expect("ASCII-only digits");
    }

    digits
}

/// Redondea una cadena de dígitos significativos a `precision` dígitos.
/// Devuelve (dígitos, acarreo-total): el acarreo total señala que el
/// redondeo desbordó en un orden de magnitud ("999" → "1").
fn round_significant(digits: &str, precision: usize) -> (String, bool) {
    if precision == 0 || digits.len() <= precision {
        return (digits.trim_end_matches('0').to_string(), false);
    }

    let kept: Vec<u8> = digits.as_bytes()[..precision].to_vec();
    let round_up = digits.as_bytes()[precision] >= b'5';

    let mut kept = kept;
    let mut carry = round_up;
    if carry {
        for slot in kept.iter_mut().rev() {
            if *slot == b'9' {
                *slot = b'0';
            } else {
                *slot += 1;
                carry = false;
                break;
            }
        }
    }

    if carry {
        return ("1".to_string(), true);
    }

    let trimmed: String = String::from_utf8(kept)
        .expect("ASCII-only digits")
        .trim_end_matches('0')
        .to_string();
    (trimmed, false)
}

/// Capítulo 4: decimales pequeños, dominio |value| < 1.
pub fn encode_small_decimals(value: f64, precision: usize, symbols: Symbols) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = fraction_digits(value, precision);
    if value < 0.0 {
        format!(
            "{}{}{}",
            symbols.neg as char, digits, symbols.pos as char
        )
    } else {
        format!(
            "{}{}{}",
            symbols.pos as char, digits, symbols.neg as char
        )
    }
}

/// Capítulo 5: decimales grandes (parte entera + fraccionaria).
pub fn encode_large_decimals(value: f64, precision: usize, symbols: Symbols) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let printed = format!("{}", value.abs());
    let (integer_text, fraction_text) = match printed.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (printed, String::new()),
    };

    let integer_magnitude: i64 = integer_text.parse().unwrap_or(0);
    let integer = if value < 0.0 { -integer_magnitude } else { integer_magnitude };

    let mut out = if integer != 0 {
        encode_integers(integer, symbols)
    } else if value < 0.0 {
        format!("{}0", symbols.neg as char)
    } else {
        format!("{}0", symbols.pos as char)
    };

    if !fraction_text.is_empty() {
        // presupuesto de dígitos significativos restante tras la parte entera
        let integer_digits = if integer_magnitude != 0 { integer_text.len() } else { 0 };
        let remaining = precision.saturating_sub(integer_digits);
        let fraction_value = format!("0.{}", fraction_text)
            .parse::<f64>()
            .unwrap_or(0.0);
        let signed_fraction = if value < 0.0 { -fraction_value } else { fraction_value };
        out.push_str(&fraction_digits(signed_fraction, remaining));
    }

    if value < 0.0 {
        out.push(symbols.pos as char);
    } else {
        out.push(symbols.neg as char);
    }

    out
}

/// Descompone |value| ≠ 0 en (dígitos-de-mantisa, exponente) decimales
/// tales que value = ±0.D × 10^exp con D sin ceros finales.
fn decimal_mantissa(value: f64, precision: usize) -> (String, i64) {
    let scientific = format!("{:e}", value.abs());
    let (mantissa_text, exponent_text) = scientific
        .split_once('e')
        .expect("scientific notation always carries an exponent");

    let digits_raw: String = mantissa_text.chars().filter(|c| *c != '.').collect();
    let digits_trimmed = digits_raw.trim_end_matches('0');
    let digits = if digits_trimmed.is_empty() { "0" } else { digits_trimmed };

    let exponent_base: i64 = exponent_text.parse().expect("well-formed exponent");
    let mut exponent = exponent_base + 1;

    let (rounded, carry) = round_significant(digits, precision);
    if carry {
        exponent += 1;
    }

    (rounded, exponent)
}

/// Capítulo 6: coma flotante. Signo, exponente codificado como entero
/// (negado para valores negativos, invirtiendo el orden), dígitos de
/// mantisa y el símbolo opuesto como terminador.
pub fn encode_floating_point(value: f64, precision: usize, symbols: Symbols) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let (mut digits, exponent) = decimal_mantissa(value, precision);

    let mut out = String::new();
    let signed_exponent = if value < 0.0 {
        out.push(symbols.neg as char);
        -exponent
    } else {
        out.push(symbols.pos as char);
        exponent
    };

    if signed_exponent != 0 {
        out.push_str(&encode_integers(signed_exponent, symbols));
    } else {
        out.push('0');
    }

    if value < 0.0 {
        let mut raw = digits.into_bytes();
        flip(&mut raw);
        digits = String::from_utf8(raw).expect("ASCII-only digits");
    }
    out.push_str(&digits);

    if value < 0.0 {
        out.push(symbols.pos as char);
    } else {
        out.push(symbols.neg as char);
    }

    out
}

// ============================================================================
// Decode
// ============================================================================

/// Cuenta el tramo de símbolos de prefijo al inicio de la región.
/// Una región que arranca en '0' devuelve cero (rama de valor nulo).
fn prefix_run(region: &[u8], symbols: Symbols, original: &str) -> Result<usize, ElenError> {
    if region.first() == Some(&b'0') {
        return Ok(0);
    }

    let prefix = *region.first().ok_or(ElenError::Empty)?;
    if prefix != symbols.pos && prefix != symbols.neg {
        return Err(ElenError::BadPrefix {
            prefix: prefix as char,
            input: original.to_string(),
        });
    }

    let run = region.iter().take_while(|byte| **byte == prefix).count();
    if run == region.len() {
        return Err(ElenError::Malformed(original.to_string()));
    }
    if !region[run].is_ascii_digit() {
        return Err(ElenError::Malformed(original.to_string()));
    }

    Ok(run)
}

/// Lee la siguiente serie de `len` dígitos, desinvierte si el prefijo
/// es negativo, avanza la posición y parsea la magnitud.
fn next_magnitude(
    region: &[u8],
    position: &mut usize,
    len: usize,
    negative: bool,
    original: &str,
) -> Result<u64, ElenError> {
    let end = position
        .checked_add(len)
        .filter(|end| *end <= region.len())
        .ok_or_else(|| ElenError::Malformed(original.to_string()))?;

    let mut digits = region[*position..end].to_vec();
    if digits.iter().any(|byte| !byte.is_ascii_digit()) {
        return Err(ElenError::Malformed(original.to_string()));
    }
    if negative {
        flip(&mut digits);
    }

    *position = end;

    std::str::from_utf8(&digits)
        .ok()
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| ElenError::Overflow(original.to_string()))
}

/// Decodifica la cadena de longitudes + magnitud de una región que
/// comienza con un tramo de prefijos. Devuelve (valor-con-signo,
/// posición tras la magnitud).
fn decode_chain(
    region: &[u8],
    symbols: Symbols,
    original: &str,
) -> Result<(i64, usize), ElenError> {
    let run = prefix_run(region, symbols, original)?;
    if run == 0 {
        return Err(ElenError::Malformed(original.to_string()));
    }

    let negative = region[0] == symbols.neg;
    let mut position = run;
    let mut len: u64 = 1;
    for _ in 0..run - 1 {
        len = next_magnitude(region, &mut position, len as usize, negative, original)?;
    }

    let magnitude = next_magnitude(region, &mut position, len as usize, negative, original)?;
    let value = if negative {
        // -magnitude alcanza i64::MIN, cuya magnitud no cabe en i64
        0i64.checked_sub_unsigned(magnitude)
            .ok_or_else(|| ElenError::Overflow(original.to_string()))?
    } else {
        i64::try_from(magnitude).map_err(|_| ElenError::Overflow(original.to_string()))?
    };

    Ok((value, position))
}

/// Capítulo 3: enteros.
pub fn decode_integers(input: &str, symbols: Symbols) -> Result<i64, ElenError> {
    let bytes = input.as_bytes();
    match bytes.len() {
        0 => return Err(ElenError::Empty),
        1 => {
            return if input == "0" {
                Ok(0)
            } else {
                Err(ElenError::Malformed(input.to_string()))
            };
        }
        _ => {}
    }

    let (value, _) = decode_chain(bytes, symbols, input)?;
    Ok(value)
}

/// Interpreta una región `prefijo dígitos sufijo` como fracción con
/// signo. Devuelve los dígitos sin invertir y el signo.
fn decode_fraction_region(
    input: &str,
    symbols: Symbols,
) -> Result<(String, bool), ElenError> {
    let bytes = input.as_bytes();
    match bytes.len() {
        0 => return Err(ElenError::Empty),
        1 => {
            return if input == "0" {
                Ok((String::new(), false))
            } else {
                Err(ElenError::Malformed(input.to_string()))
            };
        }
        2 => return Err(ElenError::Malformed(input.to_string())),
        _ => {}
    }

    let front = bytes[0];
    let back = bytes[bytes.len() - 1];
    let negative = if front == symbols.neg && back == symbols.pos {
        true
    } else if front == symbols.pos && back == symbols.neg {
        false
    } else {
        return Err(ElenError::MismatchedAffixes(input.to_string()));
    };

    let mut digits = bytes[1..bytes.len() - 1].to_vec();
    if digits.iter().any(|byte| !byte.is_ascii_digit()) {
        return Err(ElenError::Malformed(input.to_string()));
    }
    if negative {
        flip(&mut digits);
    }

    Ok((
        String::from_utf8(digits).expect("ASCII-only digits"),
        negative,
    ))
}

/// Capítulo 4: decimales pequeños.
pub fn decode_small_decimals(input: &str, symbols: Symbols) -> Result<f64, ElenError> {
    let (digits, negative) = decode_fraction_region(input, symbols)?;
    if digits.is_empty() {
        return Ok(0.0);
    }

    let literal = format!("{}0.{}", if negative { "-" } else { "" }, digits);
    literal
        .parse::<f64>()
        .map_err(|_| ElenError::Malformed(input.to_string()))
}

/// Capítulo 5: decimales grandes.
pub fn decode_large_decimals(input: &str, symbols: Symbols) -> Result<f64, ElenError> {
    let bytes = input.as_bytes();
    match bytes.len() {
        0 => return Err(ElenError::Empty),
        1 => {
            return if input == "0" {
                Ok(0.0)
            } else {
                Err(ElenError::Malformed(input.to_string()))
            };
        }
        2 => return Err(ElenError::Malformed(input.to_string())),
        _ => {}
    }

    let run = prefix_run(bytes, symbols, input)?;
    let prefix = bytes[0];

    let (integer, position) = if bytes.get(run) != Some(&b'0') {
        decode_chain(bytes, symbols, input)?
    } else {
        (0, run + 1)
    };

    let mut out = integer as f64;

    // parte fraccionaria, si queda algo además del terminador
    if position != bytes.len() - 1 {
        let mut region = vec![prefix];
        region.extend_from_slice(&bytes[position..]);
        let region_text = String::from_utf8(region)
            .map_err(|_| ElenError::Malformed(input.to_string()))?;
        out += decode_small_decimals(&region_text, symbols)?;
    }

    Ok(out)
}

/// Capítulo 6: coma flotante.
pub fn decode_floating_point(input: &str, symbols: Symbols) -> Result<f64, ElenError> {
    let bytes = input.as_bytes();
    match bytes.len() {
        0 => return Err(ElenError::Empty),
        1 => {
            return if input == "0" {
                Ok(0.0)
            } else {
                Err(ElenError::Malformed(input.to_string()))
            };
        }
        2 => return Err(ElenError::Malformed(input.to_string())),
        _ => {}
    }

    let front = bytes[0];
    let back = bytes[bytes.len() - 1];
    let negative = if front == symbols.neg && back == symbols.pos {
        true
    } else if front == symbols.pos && back == symbols.neg {
        false
    } else {
        return Err(ElenError::MismatchedAffixes(input.to_string()));
    };

    let region = &bytes[1..];
    let run = prefix_run(region, symbols, input)?;

    let (encoded_exponent, position) = if region.get(run) != Some(&b'0') {
        decode_chain(region, symbols, input)?
    } else {
        (0, run + 1)
    };
    let exponent = if negative { -encoded_exponent } else { encoded_exponent };

    // mantisa: lo que queda antes del terminador
    let mantissa_region = &region[position..region.len() - 1];
    if mantissa_region.is_empty() {
        // mantisa implícita 1 (rama nunca producida por encode)
        let literal = format!("{}1e{}", if negative { "-" } else { "" }, exponent);
        return literal
            .parse::<f64>()
            .map_err(|_| ElenError::Malformed(input.to_string()));
    }

    let mut digits = mantissa_region.to_vec();
    if digits.iter().any(|byte| !byte.is_ascii_digit()) {
        return Err(ElenError::Malformed(input.to_string()));
    }
    if negative {
        flip(&mut digits);
    }

    let literal = format!(
        "{}0.{}e{}",
        if negative { "-" } else { "" },
        String::from_utf8(digits).expect("ASCII-only digits"),
        exponent
    );
    literal
        .parse::<f64>()
        .map_err(|_| ElenError::Malformed(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: Symbols = Symbols::CLASSIC;

    // vectores históricos publicados, alfabeto clásico
    #[test]
    fn classic_integer_vectors() {
        assert_eq!(encode_integers(-1234567891, CLASSIC), "---7898765432108");
        assert_eq!(encode_integers(-1234567890, CLASSIC), "---7898765432109");
        assert_eq!(encode_integers(-1234567889, CLASSIC), "---7898765432110");
        assert_eq!(encode_integers(-11, CLASSIC), "--788");
        assert_eq!(encode_integers(-10, CLASSIC), "--789");
        assert_eq!(encode_integers(-9, CLASSIC), "-0");
        assert_eq!(encode_integers(-2, CLASSIC), "-7");
        assert_eq!(encode_integers(-1, CLASSIC), "-8");
        assert_eq!(encode_integers(0, CLASSIC), "0");
        assert_eq!(encode_integers(1, CLASSIC), "+1");
        assert_eq!(encode_integers(9, CLASSIC), "+9");
        assert_eq!(encode_integers(10, CLASSIC), "++210");
        assert_eq!(encode_integers(11, CLASSIC), "++211");
        assert_eq!(encode_integers(1234567889, CLASSIC), "+++2101234567889");
        assert_eq!(encode_integers(1234567890, CLASSIC), "+++2101234567890");
        assert_eq!(encode_integers(1234567891, CLASSIC), "+++2101234567891");
    }

    #[test]
    fn classic_integer_decode_vectors() {
        assert_eq!(decode_integers("---7898765432109", CLASSIC).unwrap(), -1234567890);
        assert_eq!(decode_integers("--788", CLASSIC).unwrap(), -11);
        assert_eq!(decode_integers("-0", CLASSIC).unwrap(), -9);
        assert_eq!(decode_integers("-8", CLASSIC).unwrap(), -1);
        assert_eq!(decode_integers("0", CLASSIC).unwrap(), 0);
        assert_eq!(decode_integers("+1", CLASSIC).unwrap(), 1);
        assert_eq!(decode_integers("++210", CLASSIC).unwrap(), 10);
        assert_eq!(decode_integers("+++2101234567891", CLASSIC).unwrap(), 1234567891);
    }

    #[test]
    fn classic_small_decimal_vectors() {
        assert_eq!(encode_small_decimals(-0.9995, 4, CLASSIC), "-0004+");
        assert_eq!(encode_small_decimals(-0.999, 3, CLASSIC), "-000+");
        assert_eq!(encode_small_decimals(-0.0123, 4, CLASSIC), "-9876+");
        assert_eq!(encode_small_decimals(-0.00123, 5, CLASSIC), "-99876+");
        assert_eq!(encode_small_decimals(-0.0001233, 7, CLASSIC), "-9998766+");
        assert_eq!(encode_small_decimals(-0.000123, 6, CLASSIC), "-999876+");
        assert_eq!(encode_small_decimals(0.0, 0, CLASSIC), "0");
        assert_eq!(encode_small_decimals(0.000123, 6, CLASSIC), "+000123-");
        assert_eq!(encode_small_decimals(0.0001233, 7, CLASSIC), "+0001233-");
        assert_eq!(encode_small_decimals(0.00123, 5, CLASSIC), "+00123-");
        assert_eq!(encode_small_decimals(0.0123, 4, CLASSIC), "+0123-");
        assert_eq!(encode_small_decimals(0.999, 3, CLASSIC), "+999-");
        assert_eq!(encode_small_decimals(0.9995, 4, CLASSIC), "+9995-");
    }

    #[test]
    fn classic_small_decimal_decode_vectors() {
        assert_eq!(decode_small_decimals("-9876+", CLASSIC).unwrap(), -0.0123);
        assert_eq!(decode_small_decimals("-99876+", CLASSIC).unwrap(), -0.00123);
        assert_eq!(decode_small_decimals("0", CLASSIC).unwrap(), 0.0);
        assert_eq!(decode_small_decimals("+000123-", CLASSIC).unwrap(), 0.000123);
        assert_eq!(decode_small_decimals("+9995-", CLASSIC).unwrap(), 0.9995);
    }

    #[test]
    fn classic_large_decimal_vectors() {
        assert_eq!(encode_large_decimals(-100.5, 4, CLASSIC), "--68994+");
        assert_eq!(encode_large_decimals(-10.5, 3, CLASSIC), "--7894+");
        assert_eq!(encode_large_decimals(-3.145, 4, CLASSIC), "-6854+");
        assert_eq!(encode_large_decimals(-3.14, 3, CLASSIC), "-685+");
        assert_eq!(encode_large_decimals(-1.01, 3, CLASSIC), "-898+");
        assert_eq!(encode_large_decimals(-1.0, 1, CLASSIC), "-8+");
        assert_eq!(encode_large_decimals(-0.0001233, 7, CLASSIC), "-09998766+");
        assert_eq!(encode_large_decimals(-0.000123, 6, CLASSIC), "-0999876+");
        assert_eq!(encode_large_decimals(0.0, 0, CLASSIC), "0");
        assert_eq!(encode_large_decimals(0.000123, 6, CLASSIC), "+0000123-");
        assert_eq!(encode_large_decimals(1.0, 1, CLASSIC), "+1-");
        assert_eq!(encode_large_decimals(1.01, 3, CLASSIC), "+101-");
        assert_eq!(encode_large_decimals(3.14, 3, CLASSIC), "+314-");
        assert_eq!(encode_large_decimals(3.145, 4, CLASSIC), "+3145-");
        assert_eq!(encode_large_decimals(10.5, 3, CLASSIC), "++2105-");
        assert_eq!(encode_large_decimals(100.5, 4, CLASSIC), "++31005-");
    }

    #[test]
    fn classic_large_decimal_decode_vectors() {
        assert_eq!(decode_large_decimals("--68994+", CLASSIC).unwrap(), -100.5);
        assert_eq!(decode_large_decimals("-6854+", CLASSIC).unwrap(), -3.145);
        assert_eq!(decode_large_decimals("-8+", CLASSIC).unwrap(), -1.0);
        assert_eq!(decode_large_decimals("0", CLASSIC).unwrap(), 0.0);
        assert_eq!(decode_large_decimals("+101-", CLASSIC).unwrap(), 1.01);
        assert_eq!(decode_large_decimals("++31005-", CLASSIC).unwrap(), 100.5);
        assert_eq!(decode_large_decimals("+0000123-", CLASSIC).unwrap(), 0.000123);
    }

    #[test]
    fn classic_floating_point_vectors() {
        assert_eq!(encode_floating_point(-0.1e11, 1, CLASSIC), "---7888+");
        assert_eq!(encode_floating_point(-0.1e10, 1, CLASSIC), "---7898+");
        assert_eq!(encode_floating_point(-1.4, 2, CLASSIC), "--885+");
        assert_eq!(encode_floating_point(-1.3, 2, CLASSIC), "--886+");
        assert_eq!(encode_floating_point(-1.0, 1, CLASSIC), "--88+");
        assert_eq!(encode_floating_point(-0.123, 4, CLASSIC), "-0876+");
        assert_eq!(encode_floating_point(-0.0123, 4, CLASSIC), "-+1876+");
        assert_eq!(encode_floating_point(-0.001233, 6, CLASSIC), "-+28766+");
        assert_eq!(encode_floating_point(-0.00123, 5, CLASSIC), "-+2876+");
        assert_eq!(encode_floating_point(0.0, 0, CLASSIC), "0");
        assert_eq!(encode_floating_point(0.00123, 5, CLASSIC), "+-7123-");
        assert_eq!(encode_floating_point(0.001233, 6, CLASSIC), "+-71233-");
        assert_eq!(encode_floating_point(0.0123, 4, CLASSIC), "+-8123-");
        assert_eq!(encode_floating_point(0.123, 3, CLASSIC), "+0123-");
        assert_eq!(encode_floating_point(1.0, 1, CLASSIC), "++11-");
        assert_eq!(encode_floating_point(1.3, 2, CLASSIC), "++113-");
        assert_eq!(encode_floating_point(1.4, 2, CLASSIC), "++114-");
        assert_eq!(encode_floating_point(0.1e10, 1, CLASSIC), "+++2101-");
        assert_eq!(encode_floating_point(0.1e11, 1, CLASSIC), "+++2111-");
    }

    #[test]
    fn classic_floating_point_decode_vectors() {
        assert_eq!(decode_floating_point("---7888+", CLASSIC).unwrap(), -0.1e11);
        assert_eq!(decode_floating_point("--885+", CLASSIC).unwrap(), -1.4);
        assert_eq!(decode_floating_point("--88+", CLASSIC).unwrap(), -1.0);
        assert_eq!(decode_floating_point("-+1876+", CLASSIC).unwrap(), -0.0123);
        assert_eq!(decode_floating_point("0", CLASSIC).unwrap(), 0.0);
        assert_eq!(decode_floating_point("+-7123-", CLASSIC).unwrap(), 0.00123);
        assert_eq!(decode_floating_point("+0123-", CLASSIC).unwrap(), 0.123);
        assert_eq!(decode_floating_point("++11-", CLASSIC).unwrap(), 1.0);
        assert_eq!(decode_floating_point("+++2111-", CLASSIC).unwrap(), 0.1e11);
    }

    #[test]
    fn malformed_input_echoes_the_buffer() {
        match decode_integers("++", CLASSIC) {
            Err(ElenError::Malformed(echo)) => assert_eq!(echo, "++"),
            other => panic!("INTEGRITY_COLLAPSE: expected Malformed, got {:?}", other),
        }

        assert!(matches!(decode_integers("", CLASSIC), Err(ElenError::Empty)));
        assert!(matches!(
            decode_integers("x5", CLASSIC),
            Err(ElenError::BadPrefix { .. })
        ));
        assert!(matches!(
            decode_small_decimals("+123+", CLASSIC),
            Err(ElenError::MismatchedAffixes(_))
        ));
    }

    // con el alfabeto por defecto, el orden de bytes coincide con el numérico
    #[test]
    fn ordered_alphabet_integers_sort_under_memcmp() {
        let witnesses: [i64; 13] = [
            i64::MIN, -1234567890, -100, -11, -10, -9, -1, 0, 1, 9, 10, 100, i64::MAX,
        ];
        for window in witnesses.windows(2) {
            let lo = encode_integers(window[0], Symbols::ORDERED);
            let hi = encode_integers(window[1], Symbols::ORDERED);
            assert!(
                lo.as_bytes() < hi.as_bytes(),
                "ORDER_VIOLATION: {} ({:?}) !< {} ({:?})",
                window[0], lo, window[1], hi
            );
        }
    }

    #[test]
    fn ordered_alphabet_floats_sort_under_memcmp() {
        let witnesses: [f64; 15] = [
            -1.0e10, -100.5, -10.5, -1.4, -1.3, -1.0, -0.9995, -0.999, -0.0123, 0.0,
            0.00123, 0.123, 1.0, 1.3, 1.0e10,
        ];
        for window in witnesses.windows(2) {
            let lo = encode_floating_point(window[0], DOUBLE_PRECISION, Symbols::ORDERED);
            let hi = encode_floating_point(window[1], DOUBLE_PRECISION, Symbols::ORDERED);
            assert!(
                lo.as_bytes() < hi.as_bytes(),
                "ORDER_VIOLATION: {} ({:?}) !< {} ({:?})",
                window[0], lo, window[1], hi
            );
        }
    }

    #[test]
    fn ordered_alphabet_roundtrips_exactly() {
        for value in [0i64, 1, -1, 42, -42, 999999, i64::MAX, i64::MIN + 1] {
            let encoded = encode_integers(value, Symbols::ORDERED);
            assert_eq!(decode_integers(&encoded, Symbols::ORDERED).unwrap(), value);
        }

        for value in [0.0f64, 6.0, -6.0, 0.125, -0.125, 1234.5678, 1.0e-9, -3.0e12] {
            let encoded = encode_floating_point(value, DOUBLE_PRECISION, Symbols::ORDERED);
            let decoded = decode_floating_point(&encoded, Symbols::ORDERED).unwrap();
            assert_eq!(decoded, value, "ROUNDTRIP_DRIFT on {:?}", encoded);
        }
    }
}
