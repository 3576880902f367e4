use crate::models::NamingScheme;

/// Подпись ряда по индексу: A..Z, AA, AB, ... либо 1, 2, 3...
pub fn row_label(index: usize, naming: NamingScheme) -> String {
    match naming {
        NamingScheme::Numeric => (index + 1).to_string(),
        NamingScheme::Alpha => alpha_label(index),
    }
}

// Биективная 26-ричная запись, как у колонок в таблицах.
fn alpha_label(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
