//! Display titles derived from audio file names

/// Title for an audio file name
///
/// Strips `.<extension>`, turns the first underscore (only the first)
/// into a space, then upper-cases the first letter of each space
/// separated word. `rain_drops_soft.mp3` becomes `Rain Drops_soft`.
pub fn display_title(file_name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    let stem = file_name.strip_suffix(&suffix).unwrap_or(file_name);
    let spaced = stem.replacen('_', " ", 1);

    spaced
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
