// Command identifiers and the static menu table
//
// Commands are data: the table below fixes identity, label key and menu
// grouping, while rendering and dispatch live elsewhere. Language entries
// are not in the table because they depend on which locale files were
// found at startup; they are generated from the localizer instead.

use crate::i18n::Localizer;

/// Identity of a dispatchable command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandId {
    LoadFiles,
    LoadFolders,
    Reset,
    ExportAll,
    SaveLog,
    /// Switch the active language to the carried locale code.
    SetLanguage(String),
}

/// One fixed menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: CommandId,
    /// Localization key of the label, resolved at render time.
    pub label_key: &'static str,
    /// Render a separator above this row.
    pub separator_before: bool,
}

/// Fixed commands in menu order. Language rows follow, via
/// [`language_entries`].
pub static MENU: &[MenuEntry] = &[
    MenuEntry {
        id: CommandId::LoadFiles,
        label_key: "menu.load_files",
        separator_before: false,
    },
    MenuEntry {
        id: CommandId::LoadFolders,
        label_key: "menu.load_folders",
        separator_before: false,
    },
    MenuEntry {
        id: CommandId::Reset,
        label_key: "menu.reset",
        separator_before: true,
    },
    MenuEntry {
        id: CommandId::ExportAll,
        label_key: "menu.export_all",
        separator_before: true,
    },
    MenuEntry {
        id: CommandId::SaveLog,
        label_key: "menu.save_log",
        separator_before: false,
    },
];

/// One language command per loaded locale, labelled with the native name.
pub fn language_entries(localizer: &Localizer) -> Vec<(CommandId, String)> {
    localizer
        .available_languages()
        .into_iter()
        .map(|(code, name)| (CommandId::SetLanguage(code), name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order_is_fixed() {
        let ids: Vec<&CommandId> = MENU.iter().map(|entry| &entry.id).collect();
        assert_eq!(
            ids,
            vec![
                &CommandId::LoadFiles,
                &CommandId::LoadFolders,
                &CommandId::Reset,
                &CommandId::ExportAll,
                &CommandId::SaveLog,
            ]
        );
    }

    #[test]
    fn test_menu_groups_reset_and_export() {
        let separated: Vec<&str> = MENU
            .iter()
            .filter(|entry| entry.separator_before)
            .map(|entry| entry.label_key)
            .collect();
        assert_eq!(separated, vec!["menu.reset", "menu.export_all"]);
    }

    #[test]
    fn test_language_entries_come_from_the_localizer() {
        let localizer = Localizer::new();
        let entries = language_entries(&localizer);
        assert_eq!(
            entries,
            vec![(
                CommandId::SetLanguage("en".to_string()),
                "English".to_string()
            )]
        );
    }
}
