// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! Built-in icon catalog.
//!
//! `list_icons` reports this catalog as-is. Attaching an icon does not check
//! against it — callers may use names from newer catalogs than the one
//! compiled in, matching how the original host treated unknown icon names.

pub const ICON_CATALOG: [&str; 40] = [
    "idea",
    "help",
    "yes",
    "messagebox_warning",
    "stop-sign",
    "closed",
    "info",
    "button_ok",
    "button_cancel",
    "full-1",
    "full-2",
    "full-3",
    "full-4",
    "full-5",
    "full-6",
    "full-7",
    "full-8",
    "full-9",
    "full-0",
    "prepare",
    "go",
    "back",
    "forward",
    "up",
    "down",
    "attach",
    "flag",
    "flag-black",
    "flag-blue",
    "flag-green",
    "flag-orange",
    "flag-pink",
    "flag-yellow",
    "bookmark",
    "clock",
    "hourglass",
    "calendar",
    "pencil",
    "checked",
    "unchecked",
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::ICON_CATALOG;

    #[test]
    fn catalog_has_no_duplicates() {
        let unique: BTreeSet<&str> = ICON_CATALOG.iter().copied().collect();
        assert_eq!(unique.len(), ICON_CATALOG.len());
    }
}
