//! Display labels used in issue messages.

use crate::graph::Entity;

/// Short human label: `name`, then `ref`, then the feature type, then the id
pub fn display_label(entity: &Entity) -> String {
    if let Some(name) = entity.tag("name").filter(|v| !v.trim().is_empty()) {
        return name.to_string();
    }
    if let Some(reference) = entity.tag("ref").filter(|v| !v.trim().is_empty()) {
        return reference.to_string();
    }

    let feature = entity
        .tag("highway")
        .map(|value| format!("{} road", humanize(value)))
        .or_else(|| entity.tag("type").map(humanize));

    match feature {
        Some(feature) => format!("{} {}", capitalize(&feature), entity.id()),
        None => entity.id().to_string(),
    }
}

fn humanize(value: &str) -> String {
    value.replace('_', " ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
