//! Identifier case conversion for formatter re-enforcement (spec §4.7).
//!
//! Splits an identifier into words at underscores and camel/Pascal-case
//! boundaries, then rejoins in the target convention. Idempotent: an
//! identifier already in the target case round-trips unchanged.

fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for i in 0..chars.len() {
        let c = chars[i];
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = current.chars().last().unwrap();
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

pub fn to_upper_snake_case(s: &str) -> String {
    split_words(s).iter().map(|w| w.to_uppercase()).collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_is_idempotent() {
        assert_eq!(to_pascal_case("UserId"), "UserId");
        assert_eq!(to_pascal_case("user_id"), "UserId");
        assert_eq!(to_pascal_case("userId"), "UserId");
    }

    #[test]
    fn camel_case_is_idempotent() {
        assert_eq!(to_camel_case("userId"), "userId");
        assert_eq!(to_camel_case("user_id"), "userId");
        assert_eq!(to_camel_case("UserId"), "userId");
    }

    #[test]
    fn upper_snake_case_is_idempotent() {
        assert_eq!(to_upper_snake_case("MAX_SIZE"), "MAX_SIZE");
        assert_eq!(to_upper_snake_case("maxSize"), "MAX_SIZE");
        assert_eq!(to_upper_snake_case("max_size"), "MAX_SIZE");
    }
}
