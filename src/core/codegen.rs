//! IX-005: Command synthesis — dispatch to action handlers.
//!
//! install / upgrade / uninstall render one command per record and join them
//! per the output format; import always renders the JSON manifest.
//! Output depends on nothing but the arguments, so repeated calls are
//! byte-identical.

use super::error::BuildError;
use super::types::{Action, AppRecord, CommandOptions, OutputFormat};
use crate::actions;

/// Joiner for the single-line pipeline format.
const PIPELINE_SEPARATOR: &str = " ; ";

/// Build command text for `action` over `records`.
///
/// An empty selection is an error for install, upgrade, and uninstall; for
/// import it yields the empty manifest `[]`.
pub fn build_command(
    action: Action,
    records: &[AppRecord],
    options: &CommandOptions,
) -> Result<String, BuildError> {
    let render: fn(&AppRecord, &CommandOptions) -> String = match action {
        Action::Import => return actions::manifest::export(records),
        Action::Install => actions::winget::install_line,
        Action::Upgrade => actions::winget::upgrade_line,
        Action::Uninstall => actions::winget::uninstall_line,
    };

    if records.is_empty() {
        return Err(BuildError::EmptySelection { action });
    }

    let lines: Vec<String> = records.iter().map(|r| render(r, options)).collect();
    let separator = match options.output_format {
        OutputFormat::Multiline => "\n",
        OutputFormat::Powershell => PIPELINE_SEPARATOR,
    };
    Ok(lines.join(separator))
}

/// Build command text from an action name (`install`, `upgrade`, ...).
pub fn build_command_named(
    action: &str,
    records: &[AppRecord],
    options: &CommandOptions,
) -> Result<String, BuildError> {
    build_command(action.parse()?, records, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Source;

    fn sample() -> Vec<AppRecord> {
        vec![
            AppRecord::new("7zip.7zip", "7-Zip", "22.01")
                .with_available_version(Some("23.01".to_string()))
                .with_source(Some(Source::Winget)),
            AppRecord::new("Microsoft VS Code", "VS Code", "")
                .with_source(Some(Source::Winget)),
        ]
    }

    #[test]
    fn test_ix005_upgrade_silent_multiline() {
        let records = vec![AppRecord::new("7zip.7zip", "", "")];
        let options = CommandOptions {
            include_silent: true,
            output_format: OutputFormat::Multiline,
            ..Default::default()
        };
        let out = build_command(Action::Upgrade, &records, &options).unwrap();
        assert_eq!(out, r#"winget upgrade --id "7zip.7zip" --exact --silent"#);
    }

    #[test]
    fn test_ix005_parsed_records_never_target_blank_id() {
        let raw = r#"[{"Id":"  ","Name":"Tool"},{"Id":"","DisplayName":""},{"PackageIdentifier":"a.b"}]"#;
        let records = crate::core::parser::parse_inventory(raw).unwrap();
        let out = build_command(Action::Uninstall, &records, &CommandOptions::default()).unwrap();
        assert!(!out.contains(r#"--id """#));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_ix005_install_multiline_order() {
        let out = build_command(Action::Install, &sample(), &CommandOptions::default()).unwrap();
        let expected = "winget install --id \"7zip.7zip\" --version \"22.01\" --exact\n\
                        winget install --id \"Microsoft VS Code\" --exact";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_ix005_powershell_pipeline() {
        let options = CommandOptions {
            use_force: true,
            output_format: OutputFormat::Powershell,
            ..Default::default()
        };
        let out = build_command(Action::Uninstall, &sample(), &options).unwrap();
        assert_eq!(
            out,
            "winget uninstall --id \"7zip.7zip\" --exact --force ; \
             winget uninstall --id \"Microsoft VS Code\" --exact --force"
        );
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_ix005_import_ignores_options() {
        let options = CommandOptions {
            include_silent: true,
            use_force: true,
            output_format: OutputFormat::Powershell,
        };
        let a = build_command(Action::Import, &sample(), &options).unwrap();
        let b = build_command(Action::Import, &sample(), &CommandOptions::default()).unwrap();
        assert_eq!(a, b);
        assert!(!a.contains("--silent"));

        let parsed: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&a).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_ix005_import_key_order() {
        let out = build_command(Action::Import, &sample()[..1], &CommandOptions::default()).unwrap();
        let id = out.find("\"id\"").unwrap();
        let version = out.find("\"version\"").unwrap();
        let source = out.find("\"source\"").unwrap();
        assert!(id < version && version < source);
    }

    #[test]
    fn test_ix005_empty_selection() {
        for action in [Action::Install, Action::Upgrade, Action::Uninstall] {
            let err = build_command(action, &[], &CommandOptions::default()).unwrap_err();
            assert!(matches!(err, BuildError::EmptySelection { action: a } if a == action));
        }
    }

    #[test]
    fn test_ix005_empty_import_is_empty_manifest() {
        let out = build_command(Action::Import, &[], &CommandOptions::default()).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_ix005_named_action() {
        let out = build_command_named("upgrade", &sample(), &CommandOptions::default()).unwrap();
        assert!(out.starts_with("winget upgrade"));
        let err = build_command_named("purge", &sample(), &CommandOptions::default()).unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedAction(_)));
    }

    #[test]
    fn test_ix005_input_not_mutated() {
        let records = sample();
        let before = records.clone();
        build_command(Action::Install, &records, &CommandOptions::default()).unwrap();
        assert_eq!(records, before);
    }
}
