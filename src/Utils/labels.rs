/// Characters downstream model tools choke on in species labels.
const FORBIDDEN: [char; 3] = ['(', ')', '#'];

/// Replace parentheses and `#` with underscores. Reaction-string labels of
/// transition states are left to the caller; this is for plain species.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect()
}

pub fn needs_sanitizing(label: &str) -> bool {
    label.chars().any(|c| FORBIDDEN.contains(&c))
}
