mod common;

use common::{code_with, modes, CODE, CURRENT_MODE, GROWTH_MODE, NORMAL_MODE, ARMS_RACE_MODE};
use runvault_core::{
    format_score, strip_wrapping, validate, Category, FieldKey, Region, RunRecord,
    ValidationError,
};

// ── Round trip ──────────────────────────────────────────────────────────

#[test]
fn formatted_record_keeps_every_field() {
    let parser = modes();
    for text in [CODE.to_string(), format!("`{CODE}`"), strip_wrapping(CODE).to_string()] {
        let record = RunRecord::parse(&text, &parser).unwrap();
        let formatted = record.format(false);
        assert_eq!(strip_wrapping(&formatted), strip_wrapping(CODE));
        assert_eq!(record.format(true), format!("`{CODE}`"));
    }
}

#[test]
fn parsed_fields_have_their_types() {
    let record = RunRecord::parse(CODE, &modes()).unwrap();
    assert_eq!(record.id(), "6e2121d4");
    assert_eq!(record.server().name(), "ef");
    assert_eq!(record.server().region(), Region::Europe);
    assert!(record.server().is_sandbox());
    assert_eq!(record.tank_class(), "Auto-Tri-Angle");
    assert_eq!(record.build().parts(), &[8, 8, 9, 9, 9, 9, 9, 7, 1, 0]);
    assert_eq!(record.score(), 10_083_590);
    assert_eq!(record.runtime_seconds(), 2720);
    assert_eq!(record.kills(), 9);
    assert_eq!(record.assists(), 3);
    assert_eq!(record.boss_kills(), 0);
    assert_eq!(record.polygons_destroyed(), 536);
    assert_eq!(record.custom_kills(), 9);
    assert_eq!(record.creation_unix(), 1_728_507_182);
    assert_eq!(record.safety_token(), "5lZqbl5uVQDOddyJ");
    assert_eq!(record.formatted_score().unwrap(), "10.0m");
}

// ── Validation ──────────────────────────────────────────────────────────

#[test]
fn wrong_field_count_reports_observed_count() {
    let short = "(6e2121d4:#ef:w33oldscdreadnoughts2)";
    assert_eq!(
        validate(short, &modes()).unwrap_err(),
        ValidationError::FieldCount { observed: 3 }
    );

    let long = format!("{}:extra)", CODE.trim_end_matches(')'));
    assert_eq!(
        validate(&long, &modes()).unwrap_err(),
        ValidationError::FieldCount { observed: 15 }
    );
}

#[test]
fn single_invalid_field_is_named() {
    let cases = [
        (0, "6E2121D4", FieldKey::Id),
        (1, "ef", FieldKey::Server),
        (3, "Auto Tri-", FieldKey::Tank),
        (4, "8/8/", FieldKey::Build),
        (5, "10.5", FieldKey::Score),
        (7, "-9", FieldKey::Kills),
        (12, "soon", FieldKey::Creation),
    ];
    for (position, value, field) in cases {
        let text = code_with(&[(position, value)]);
        assert_eq!(
            validate(&text, &modes()).unwrap_err(),
            ValidationError::FieldPattern { field },
            "field {field} with value {value:?}"
        );
    }
}

#[test]
fn earliest_invalid_field_wins() {
    let text = code_with(&[(4, "x"), (9, "many")]);
    assert_eq!(
        validate(&text, &modes()).unwrap_err(),
        ValidationError::FieldPattern {
            field: FieldKey::Build
        }
    );
}

#[test]
fn unknown_mode_is_a_mode_error() {
    let text = code_with(&[(2, "nosuchmode")]);
    let err = validate(&text, &modes()).unwrap_err();
    match err {
        ValidationError::ModeParse { mode, message } => {
            assert_eq!(mode, "nosuchmode");
            assert_eq!(message, "Unknown gamemode 'nosuchmode'.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn pipe_region_passes_validation_but_not_construction() {
    let text = code_with(&[(1, "#|f")]);
    assert!(validate(&text, &modes()).is_ok());
    assert!(matches!(
        RunRecord::parse(&text, &modes()).unwrap_err(),
        ValidationError::UnknownRegion { .. }
    ));
}

// ── Derived values ──────────────────────────────────────────────────────

#[test]
fn score_suffix_follows_digit_count() {
    assert_eq!(format_score(10_083_590).unwrap(), "10.0m");
    assert_eq!(format_score(750_000).unwrap(), "750K");
    assert_eq!(format_score(1_500_000).unwrap(), "1.50m");
    assert_eq!(format_score(2_140_000_000).unwrap(), "2.14b");
    assert!(format_score(99_999).is_err());
    assert!(format_score(10_000_000_000).is_err());
}

#[test]
fn category_follows_mode_capabilities() {
    let parser = modes();
    let category = |mode: &str| {
        RunRecord::parse(&code_with(&[(2, mode)]), &parser)
            .unwrap()
            .category()
    };
    assert_eq!(category(NORMAL_MODE), Category::Normal);
    assert_eq!(category(GROWTH_MODE), Category::Growth);
    assert_eq!(category(ARMS_RACE_MODE), Category::ArmsRace);
    assert_eq!(RunRecord::parse(CODE, &parser).unwrap().category(), Category::LegacyVariant);
    assert_eq!(category(CURRENT_MODE), Category::CurrentVariant);
}

#[test]
fn summary_blurs_token_on_request() {
    let record = RunRecord::parse(CODE, &modes()).unwrap();
    assert!(record.summary(true).contains("||5lZqbl5uVQDOddyJ||"));
    assert!(record.summary(false).contains("Safety token: 5lZqbl5uVQDOddyJ"));
    assert!(record.summary(false).contains("https://arras.io/#ef"));
}
