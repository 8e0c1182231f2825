//! Display-name convention for pooled instances
//!
//! Instances are named `"{Template} ({Ordinal})"`. Despawning by object
//! recovers the template name by cutting at the last `(` and dropping the
//! character before it.

/// Display name of the `ordinal`-th instance of `template`
pub fn instance_name(template: &str, ordinal: u32) -> String {
    format!("{} ({})", template, ordinal)
}

/// Template name encoded in an instance display name
///
/// Returns `None` when the name has no `(` or nothing precedes it.
pub fn template_name_of(display_name: &str) -> Option<&str> {
    let open = display_name.rfind('(')?;
    let head = &display_name[..open];
    let (last, _) = head.char_indices().next_back()?;
    Some(&head[..last])
}
