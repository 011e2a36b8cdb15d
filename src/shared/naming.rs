/// Convert a declared field name to its JSON name.
///
/// Underscores are dropped and capitalize the following lowercase letter.
/// Characters of the first word are lowercased; the first word ends at a
/// capital that follows a non-capital (`fooBar`) or at a capital followed by
/// a lowercase letter (`HTTPServer` → `httpServer`).
#[must_use]
pub fn to_json_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());

    let mut capitalize_next = false;
    let mut was_cap = true;
    let mut first_word = true;

    for (idx, &ch) in chars.iter().enumerate() {
        let is_cap = ch.is_uppercase();

        if ch == '_' {
            capitalize_next = true;
            if !out.is_empty() {
                first_word = false;
            }
        } else if first_word {
            let ends_first_word = !out.is_empty()
                && is_cap
                && (!was_cap || chars.get(idx + 1).is_some_and(|next| next.is_lowercase()));
            if ends_first_word {
                first_word = false;
                out.push(ch);
            } else {
                out.extend(ch.to_lowercase());
            }
        } else if capitalize_next {
            capitalize_next = false;
            if ch.is_lowercase() {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
        } else {
            out.push(ch);
        }

        was_cap = is_cap;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::to_json_name;

    #[test]
    fn snake_case_becomes_camel_case() {
        assert_eq!(to_json_name("foo_bar"), "fooBar");
        assert_eq!(to_json_name("foo_bar_baz"), "fooBarBaz");
        assert_eq!(to_json_name("foo__bar"), "fooBar");
        assert_eq!(to_json_name("simple"), "simple");
        assert_eq!(to_json_name(""), "");
    }

    #[test]
    fn leading_capitals_are_lowered() {
        assert_eq!(to_json_name("FooBar"), "fooBar");
        assert_eq!(to_json_name("HTTPServer"), "httpServer");
        assert_eq!(to_json_name("FOO"), "foo");
        assert_eq!(to_json_name("ABc"), "aBc");
    }

    #[test]
    fn capitals_after_first_word_are_kept() {
        assert_eq!(to_json_name("FOO_BAR"), "fooBAR");
        assert_eq!(to_json_name("fooBar_baz"), "fooBarBaz");
        assert_eq!(to_json_name("foo_Bar"), "fooBar");
    }

    #[test]
    fn digits_and_leading_underscores() {
        assert_eq!(to_json_name("foo_1bar"), "foo1bar");
        assert_eq!(to_json_name("field_2"), "field2");
        assert_eq!(to_json_name("_foo"), "foo");
        assert_eq!(to_json_name("_foo_bar"), "fooBar");
        assert_eq!(to_json_name("trailing_"), "trailing");
    }

    #[test]
    fn pending_capital_survives_first_word_boundary() {
        // The leading underscore arms capitalization, which first fires after
        // the first word has ended.
        assert_eq!(to_json_name("_fooBar"), "fooBAr");
    }
}
