mod common;

use intake_core::models::{AnswerValue, Field, FieldType, Operator, Page, RuleAction, Schema};
use intake_instruments::get_instrument;
use intake_runtime::{FlowController, FlowError, FlowState};

use common::{config, hide, init_tracing, intake_schema, rule, show};

fn now() -> jiff::Timestamp {
    jiff::Timestamp::from_second(1_792_400_000).unwrap()
}

fn start(schema: Schema) -> FlowController {
    init_tracing();
    FlowController::new(schema, config()).unwrap()
}

#[test]
fn required_field_blocks_next() {
    let mut flow = start(intake_schema());
    assert_eq!(flow.state(), FlowState::AtPage(0));

    let Err(FlowError::Blocked(errors)) = flow.next() else {
        panic!("expected next to be blocked");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_id, "full_name");
    assert_eq!(flow.state(), FlowState::AtPage(0));

    flow.set_answer("full_name", "Ada Lovelace").unwrap();
    assert_eq!(flow.next().unwrap(), FlowState::AtPage(1));
}

#[test]
fn invalid_optional_answer_also_blocks() {
    let mut flow = start(intake_schema());
    flow.set_answer("full_name", "Ada Lovelace").unwrap();
    flow.set_answer("email", "ada@").unwrap();
    assert!(matches!(flow.next(), Err(FlowError::Blocked(e)) if e[0].field_id == "email"));

    flow.clear_answer("email").unwrap();
    assert!(flow.next().is_ok());
}

#[test]
fn conditional_field_is_required_only_while_visible() {
    let mut flow = start(intake_schema());
    flow.set_answer("full_name", "Ada Lovelace").unwrap();
    flow.next().unwrap();

    let visible: Vec<_> = flow.visible_fields(1).iter().map(|f| f.id.clone()).collect();
    assert_eq!(visible, ["symptoms"]);

    flow.set_answer("symptoms", vec!["pain", "other"]).unwrap();
    assert!(!flow.effects().is_hidden("other_detail"));
    let Err(FlowError::Blocked(errors)) = flow.next() else {
        panic!("expected the revealed field to block");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_id, "other_detail");

    flow.set_answer("symptoms", vec!["pain"]).unwrap();
    assert!(flow.effects().is_hidden("other_detail"));
    assert_eq!(flow.next().unwrap(), FlowState::AtPage(2));
}

#[test]
fn back_never_validates_and_stops_at_first_page() {
    let mut flow = start(intake_schema());
    assert_eq!(flow.back().unwrap(), FlowState::AtPage(0));

    flow.set_answer("full_name", "Ada Lovelace").unwrap();
    flow.next().unwrap();
    flow.clear_answer("full_name").unwrap();
    assert_eq!(flow.back().unwrap(), FlowState::AtPage(0));
}

#[test]
fn jump_only_to_reached_pages() {
    let mut flow = start(intake_schema());
    assert!(matches!(
        flow.jump_to(2),
        Err(FlowError::PageNotReached { requested: 2, furthest: 0 })
    ));

    flow.set_answer("full_name", "Ada Lovelace").unwrap();
    flow.next().unwrap();
    flow.next().unwrap();
    assert_eq!(flow.furthest_page(), 2);

    assert_eq!(flow.jump_to(0).unwrap(), FlowState::AtPage(0));
    assert_eq!(flow.jump_to(2).unwrap(), FlowState::AtPage(2));
    assert!(flow.jump_to(7).is_err());
}

#[test]
fn submit_runs_once_from_the_last_page() {
    let mut flow = start(intake_schema());
    assert!(matches!(flow.submit(now()), Err(FlowError::NotOnLastPage)));

    flow.set_answer("full_name", "Ada Lovelace").unwrap();
    flow.next().unwrap();
    flow.set_answer("symptoms", vec!["other"]).unwrap();
    flow.set_answer("other_detail", "Dizzy spells").unwrap();
    flow.set_answer("symptoms", vec!["fatigue"]).unwrap();
    flow.next().unwrap();
    assert!(flow.is_last_page());

    assert!(matches!(flow.submit(now()), Err(FlowError::Blocked(_))));
    flow.set_answer("consent", "yes").unwrap();

    let submission = flow.submit(now()).unwrap().clone();
    assert_eq!(submission.schema_version(), 1);
    assert_eq!(submission.submitted_at(), now());
    assert_eq!(submission.answers()["consent"], AnswerValue::from("yes"));
    // Hidden by the time of submission, so the stale answer is dropped.
    assert!(!submission.answers().contains_key("other_detail"));

    assert_eq!(flow.state(), FlowState::Submitted);
    assert!(matches!(flow.submit(now()), Err(FlowError::AlreadySubmitted)));
    assert!(matches!(flow.set_answer("consent", "no"), Err(FlowError::AlreadySubmitted)));
    assert!(matches!(flow.next(), Err(FlowError::AlreadySubmitted)));
    assert_eq!(flow.submission(), Some(&submission));
}

#[test]
fn answers_must_target_enabled_answerable_fields() {
    let mut schema = Schema::new("Checks");
    schema.pages = vec![Page::new(
        "p1",
        "Page",
        vec![
            Field::new("age", FieldType::Number, "Age"),
            Field::new("guardian", FieldType::ShortText, "Guardian"),
            Field::new("note", FieldType::StaticMessage, "Bring photo ID"),
        ],
    )];
    schema.conditional_rules = vec![rule(
        "adult_disables_guardian",
        "age",
        Operator::GreaterThan,
        Some(17.into()),
        RuleAction::DisableField {
            target_id: "guardian".into(),
        },
    )];
    let mut flow = start(schema);

    assert!(matches!(flow.set_answer("nope", "x"), Err(FlowError::UnknownField(_))));
    assert!(matches!(flow.set_answer("note", "x"), Err(FlowError::NotAnswerable(_))));

    flow.set_answer("age", 40).unwrap();
    assert!(matches!(flow.set_answer("guardian", "Mum"), Err(FlowError::FieldDisabled(_))));

    flow.set_answer("age", 12).unwrap();
    flow.set_answer("guardian", "Mum").unwrap();
}

#[test]
fn disabled_required_field_does_not_block() {
    let mut schema = Schema::new("Referral");
    schema.pages = vec![
        Page::new(
            "referral",
            "Referral",
            vec![
                Field::new("referrer", FieldType::ShortText, "Referring clinician"),
                Field::new("reason", FieldType::LongText, "Reason for visit").required(),
            ],
        ),
        Page::new(
            "consent",
            "Consent",
            vec![Field::new("agree", FieldType::ShortText, "Agree")],
        ),
    ];
    schema.conditional_rules = vec![rule(
        "referral_locks_reason",
        "referrer",
        Operator::IsNotEmpty,
        None,
        RuleAction::DisableField {
            target_id: "reason".into(),
        },
    )];
    let mut flow = start(schema);
    assert!(matches!(flow.next(), Err(FlowError::Blocked(_))));

    flow.set_answer("referrer", "Dr. Osei").unwrap();
    assert!(flow.visible_fields(0).iter().any(|f| f.id == "reason"));
    assert!(flow.render().fields[1].disabled);
    assert_eq!(flow.next().unwrap(), FlowState::AtPage(1));

    flow.back().unwrap();
    flow.clear_answer("referrer").unwrap();
    let Err(FlowError::Blocked(errors)) = flow.next() else {
        panic!("expected the re-enabled field to block");
    };
    assert_eq!(errors[0].field_id, "reason");
}

#[test]
fn messages_follow_their_target_visibility() {
    let mut schema = Schema::new("Allergies");
    schema.pages = vec![Page::new(
        "allergies",
        "Allergies",
        vec![
            Field::new("allergic", FieldType::ShortText, "Any allergies?"),
            Field::new("allergy_list", FieldType::LongText, "List them"),
        ],
    )];
    schema.conditional_rules = vec![
        rule(
            "reveal_list",
            "allergic",
            Operator::Equals,
            Some("yes".into()),
            show("allergy_list"),
        ),
        rule(
            "list_hint",
            "allergic",
            Operator::IsNotEmpty,
            None,
            RuleAction::ShowMessage {
                target_id: "allergy_list".into(),
                message: "Include medication allergies".into(),
            },
        ),
    ];
    let mut flow = start(schema);

    flow.set_answer("allergic", "no").unwrap();
    let view = flow.render();
    assert_eq!(view.fields.len(), 1);
    assert!(view.messages.is_empty());
    assert_eq!(flow.effects().messages.len(), 1);

    flow.set_answer("allergic", "yes").unwrap();
    let view = flow.render();
    assert_eq!(view.fields.len(), 2);
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.messages[0].message, "Include medication allergies");
}

#[test]
fn cycle_leaves_answers_untouched() {
    let mut schema = Schema::new("Cyclic");
    schema.pages = vec![Page::new(
        "p1",
        "Page",
        vec![
            Field::new("a", FieldType::ShortText, "A"),
            Field::new("b", FieldType::ShortText, "B"),
        ],
    )];
    schema.conditional_rules = vec![
        rule("a_shows_b", "a", Operator::Equals, Some("x".into()), show("b")),
        rule("b_hides_a", "b", Operator::IsNotEmpty, None, hide("a")),
    ];
    let mut flow = start(schema);

    flow.set_answer("a", "x").unwrap();
    let before = flow.answers().clone();
    let effects_before = flow.effects().clone();

    assert!(matches!(flow.set_answer("b", "y"), Err(FlowError::Cycle(_))));
    assert_eq!(flow.answers(), &before);
    assert_eq!(flow.effects(), &effects_before);
}

#[test]
fn defaults_seed_answers_and_progress() {
    let mut schema = Schema::new("Defaults");
    let mut language = Field::new("language", FieldType::Select, "Preferred language")
        .with_options(&[("en", "English"), ("es", "Spanish")]);
    language.default_value = Some("en".into());
    schema.pages = vec![Page::new(
        "p1",
        "Page",
        vec![language, Field::new("name", FieldType::ShortText, "Name")],
    )];

    let flow = start(schema);
    assert_eq!(flow.answers()["language"], AnswerValue::from("en"));
    let progress = flow.progress();
    assert_eq!((progress.answered, progress.total), (1, 2));
    assert_eq!(progress.percent(), 50);
}

#[test]
fn progress_ignores_hidden_fields() {
    let mut flow = start(intake_schema());
    assert_eq!(flow.progress().total, 4);

    flow.set_answer("symptoms", vec!["other"]).unwrap();
    assert_eq!(flow.progress().total, 5);
    flow.set_answer("other_detail", "Dizzy spells").unwrap();
    assert_eq!(flow.progress().answered, 2);

    flow.set_answer("symptoms", vec!["pain"]).unwrap();
    let progress = flow.progress();
    assert_eq!((progress.answered, progress.total), (1, 4));
}

#[test]
fn render_describes_the_current_page() {
    let mut flow = start(intake_schema());
    let view = flow.render();
    assert_eq!(view.page_index, 0);
    let fields: Vec<_> = view.fields.iter().map(|f| (f.field_id.as_str(), f.required)).collect();
    assert_eq!(fields, [("full_name", true), ("email", false)]);

    flow.set_answer("full_name", "Ada Lovelace").unwrap();
    flow.next().unwrap();
    flow.set_answer("symptoms", vec!["other"]).unwrap();
    let view = flow.render();
    let ids: Vec<_> = view.fields.iter().map(|f| f.field_id.as_str()).collect();
    assert_eq!(ids, ["symptoms", "other_detail"]);
    assert!(view.fields[1].required);
}

#[test]
fn hidden_pages_are_skipped() {
    let mut schema = Schema::new("Skips");
    schema.pages = vec![
        Page::new("p1", "Start", vec![Field::new("pregnant", FieldType::SingleChoice, "Pregnant?")
            .with_options(&[("yes", "Yes"), ("no", "No")])]),
        Page::new("p2", "Pregnancy", vec![Field::new("due_date", FieldType::Date, "Due date")]),
        Page::new("p3", "End", vec![Field::new("notes", FieldType::LongText, "Notes")]),
    ];
    schema.renumber_pages();
    schema.conditional_rules = vec![rule(
        "pregnant_shows_due_date",
        "pregnant",
        Operator::Equals,
        Some("yes".into()),
        show("due_date"),
    )];
    let mut flow = start(schema);

    flow.set_answer("pregnant", "no").unwrap();
    assert_eq!(flow.next().unwrap(), FlowState::AtPage(2));
    assert_eq!(flow.back().unwrap(), FlowState::AtPage(0));

    flow.set_answer("pregnant", "yes").unwrap();
    assert_eq!(flow.next().unwrap(), FlowState::AtPage(1));
}

#[test]
fn empty_schema_cannot_start() {
    let result = FlowController::new(Schema::new("Empty"), config());
    assert!(matches!(result, Err(FlowError::EmptySchema)));
}

#[test]
fn phq9_without_symptoms_finishes_on_the_first_page() {
    let instrument = get_instrument("phq9").unwrap();
    let mut flow = start(instrument.schema().clone());
    for n in 1..=9 {
        flow.set_answer(&format!("phq9_{n}"), "0").unwrap();
    }
    assert!(flow.is_last_page());
    assert!(matches!(flow.next(), Err(FlowError::AtLastPage)));

    let submission = flow.submit(now()).unwrap();
    assert_eq!(submission.computed_results()[instrument.score_field()], 0.0);
    assert!(submission.fired_alerts().is_empty());
    assert_eq!(instrument.severity(0.0).unwrap().label, "Minimal");
}

#[test]
fn phq9_severe_answers_score_and_alert() {
    let instrument = get_instrument("phq9").unwrap();
    let mut flow = start(instrument.schema().clone());
    for n in 1..=9 {
        flow.set_answer(&format!("phq9_{n}"), "3").unwrap();
    }
    assert_eq!(flow.next().unwrap(), FlowState::AtPage(1));
    flow.set_answer("phq9_difficulty", "very").unwrap();

    let submission = flow.submit(now()).unwrap();
    let score = submission.computed_results()[instrument.score_field()];
    assert_eq!(score, 27.0);
    assert_eq!(submission.fired_alerts().len(), 2);
    assert_eq!(instrument.severity(score).unwrap().label, "Severe");
}
