use treelens_langs::Lang;

pub fn run() {
    print!("{}", format_langs(&treelens_langs::all_with_aliases()));
}

fn format_langs(langs: &[(Lang, &[&str])]) -> String {
    let mut out = format!("Supported languages ({}):\n", langs.len());
    for (lang, names) in langs {
        let aliases: Vec<&str> = names
            .iter()
            .copied()
            .filter(|alias| *alias != lang.name())
            .collect();
        if aliases.is_empty() {
            out.push_str(&format!("  {}\n", lang.name()));
        } else {
            out.push_str(&format!("  {} ({})\n", lang.name(), aliases.join(", ")));
        }
    }
    out
}
