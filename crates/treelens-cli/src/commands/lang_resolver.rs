use treelens_langs::Lang;

/// Resolve language, returning an error message if unknown.
pub fn resolve_lang_required(lang_name: &str) -> Result<Lang, String> {
    treelens_langs::from_name(lang_name).ok_or_else(|| format!("unknown language: '{}'", lang_name))
}

/// Resolve language or exit with a suggestion for likely typos.
pub fn require_lang(lang_name: &str) -> Lang {
    resolve_lang_required(lang_name).unwrap_or_else(|msg| {
        eprintln!("error: {}", msg);
        if let Some(suggestion) = suggest_language(lang_name) {
            eprintln!();
            eprintln!("Did you mean '{}'?", suggestion);
        }
        eprintln!();
        eprintln!("Run 'treelens langs' for the full list.");
        std::process::exit(1);
    })
}

/// Suggest similar language names for typos.
pub fn suggest_language(input: &str) -> Option<String> {
    let input_lower = input.to_lowercase();
    treelens_langs::all_with_aliases()
        .into_iter()
        .filter_map(|(lang, aliases)| {
            let distance = aliases
                .iter()
                .map(|alias| levenshtein(alias, &input_lower))
                .min()?;
            (distance <= 2).then(|| (distance, lang.name().to_string()))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("json", "json"), 0);
        assert_eq!(levenshtein("jsno", "json"), 2);
        assert_eq!(levenshtein("pyhton", "python"), 2);
    }

    #[test]
    #[cfg(feature = "lang-json")]
    fn suggests_close_names() {
        assert_eq!(suggest_language("jsonn").as_deref(), Some("json"));
        assert_eq!(suggest_language("JSOM").as_deref(), Some("json"));
        assert!(suggest_language("zzzzzzzz").is_none());
    }

    #[test]
    fn unknown_language_message() {
        assert_eq!(
            resolve_lang_required("klingon").err().as_deref(),
            Some("unknown language: 'klingon'")
        );
    }
}
