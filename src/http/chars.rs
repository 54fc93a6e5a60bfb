//! Character classes from RFC 2616 §2.2.
//!
//! All predicates take a raw byte as delivered by the transport.

pub fn is_char(b: u8) -> bool {
    b <= 127
}

pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

pub fn is_ctl(b: u8) -> bool {
    b <= 31 || b == 127
}

pub fn is_cr(b: u8) -> bool {
    b == b'\r'
}

pub fn is_lf(b: u8) -> bool {
    b == b'\n'
}

pub fn is_sp(b: u8) -> bool {
    b == b' '
}

pub fn is_ht(b: u8) -> bool {
    b == b'\t'
}

pub fn is_separator(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')'
            | b'<'
            | b'>'
            | b'@'
            | b','
            | b';'
            | b':'
            | b'\\'
            | b'"'
            | b'/'
            | b'['
            | b']'
            | b'?'
            | b'='
            | b'{'
            | b'}'
            | b' '
            | b'\t'
    )
}

/// `token = 1*<any CHAR except CTLs or separators>`
pub fn is_token(b: u8) -> bool {
    is_char(b) && !is_ctl(b) && !is_separator(b)
}

/// Characters allowed in a Request-URI (RFC 3986 unreserved + reserved, plus `%`).
pub fn is_uri(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b':'
                | b'/'
                | b'?'
                | b'#'
                | b'['
                | b']'
                | b'@'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b'%'
        )
}
