/// Generate a registry id: slugified name plus a millisecond timestamp.
/// `taken` reports whether an id is already in use; a collision (two adds of
/// the same name in the same millisecond) gets an incrementing suffix.
pub(crate) fn unique_id(name: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!(
        "{}-{}",
        slug::slugify(name),
        chrono::Utc::now().timestamp_millis()
    );
    if !taken(&base) {
        return base;
    }
    let mut next = 1usize;
    loop {
        let candidate = format!("{base}-{next}");
        if !taken(&candidate) {
            return candidate;
        }
        next += 1;
    }
}
