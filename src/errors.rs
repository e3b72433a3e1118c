#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    // The literal was finite but too large in magnitude.
    Overflow,

    // The input was empty, or nothing but whitespace.
    Empty,

    // The input started with a char that cannot begin a numeral.
    // Note this is not returned for valid prefixes with trailing garbage.
    InvalidChar,
}
