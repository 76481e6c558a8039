#![cfg(unix)]

use std::fs;

use checker::{
    Checker, RunConfig, Selection,
    grade::{CATEGORIES, Grade, Scoreboard, SuiteRunner, TestOutcome},
};


use checker_support::Fixture;

fn all() -> Selection {
    Selection {
        all: true,
        ..Selection::default()
    }
}

#[tokio::test]
async fn matching_outputs_without_valgrind_score_full_points() {
    let fixture = Fixture::new().built();
    let print_easy = &CATEGORIES[0];
    fixture.add_category(print_easy);

    let paths = fixture.paths();
    let config = RunConfig::default();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let result = runner.run(print_easy).await.expect("run category");

    assert_eq!(result.grade, Grade::new(10, 10));
    assert!(result.cases.iter().all(|case| {
        case.outcome == TestOutcome::MatchedUnconfirmed && !case.memory_checked
    }));
}

#[tokio::test]
async fn one_mismatch_costs_one_case() {
    let fixture = Fixture::new().built();
    let clear_hard = &CATEGORIES[3];
    fixture.add_category(clear_hard);
    fixture.break_reference("clear_hard_3");

    let paths = fixture.paths();
    let config = RunConfig::default();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let result = runner.run(clear_hard).await.expect("run category");

    assert_eq!(result.grade, Grade::new(8, 10));
    assert_eq!(result.cases[2].outcome, TestOutcome::Mismatched);
    assert_eq!(result.cases[2].grade, Grade::new(0, 2));
}

#[tokio::test]
async fn rerunning_gives_identical_scores() {
    let fixture = Fixture::new().built();
    let analyse = &CATEGORIES[4];
    fixture.add_category(analyse);
    fixture.break_reference("analyse_1");

    let paths = fixture.paths();
    let config = RunConfig::default();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let first = runner.run(analyse).await.expect("first run");
    let second = runner.run(analyse).await.expect("second run");

    let grades = |result: &checker::grade::CategoryResult| {
        result
            .cases
            .iter()
            .map(|case| (case.outcome, case.grade))
            .collect::<Vec<_>>()
    };
    assert_eq!(grades(&first), grades(&second));
    assert_eq!(first.grade, Grade::new(16, 20));
}

#[tokio::test]
async fn output_flag_persists_captures() {
    let fixture = Fixture::new().built();
    let print_hard = &CATEGORIES[1];
    fixture.add_category(print_hard);

    let paths = fixture.paths();
    let config = RunConfig::builder().save_output(true).build();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    runner.run(print_hard).await.expect("run category");

    let saved = fs::read_to_string(fixture.root.join("tmp/print_hard_2.out")).expect("saved output");
    let reference = fs::read_to_string(fixture.root.join("output/print_hard_2.ref")).expect("reference");
    assert_eq!(saved, reference);
}

#[tokio::test]
async fn confirmed_full_run_earns_memory_bonus() {
    let fixture = Fixture::new().built();
    CATEGORIES.iter().for_each(|category| fixture.add_category(category));

    let config = RunConfig::builder().valgrind(true).selection(all()).build();
    let checker = Checker::new(fixture.paths(), config);
    let mut board = Scoreboard::new(true);
    board.set_style(Grade::new(10, 10));
    checker.run_categories(&mut board).await.expect("run categories");

    assert_eq!(board.categories().len(), 5);
    assert!(
        board
            .categories()
            .iter()
            .flat_map(|category| category.cases.iter())
            .all(|case| case.outcome == TestOutcome::MatchedConfirmed)
    );
    assert_eq!(board.memory_bonus(), 20);
    assert_eq!(board.total(), Grade::new(100, 100));
    assert!(fixture.root.join("valgrind_logs/analyse_5.log").exists());
}

#[tokio::test]
async fn one_leaky_log_forfeits_the_whole_bonus() {
    let fixture = Fixture::new().built();
    CATEGORIES.iter().for_each(|category| fixture.add_category(category));
    fixture.set_valgrind("*clear_easy_4*", "__none__");

    let config = RunConfig::builder().valgrind(true).selection(all()).build();
    let checker = Checker::new(fixture.paths(), config);
    let mut board = Scoreboard::new(true);
    board.set_style(Grade::new(10, 10));
    checker.run_categories(&mut board).await.expect("run categories");

    let leaky = &board.categories()[2].cases[3];
    assert_eq!(leaky.name, "clear_easy_4");
    assert_eq!(leaky.outcome, TestOutcome::MatchedUnconfirmed);
    assert!(leaky.memory_checked);
    assert_eq!(leaky.grade, Grade::new(2, 2));
    assert_eq!(board.base_points(), 80);
    assert_eq!(board.memory_bonus(), 0);
}

#[tokio::test]
async fn missing_log_counts_as_unconfirmed() {
    let fixture = Fixture::new().built();
    let print_easy = &CATEGORIES[0];
    fixture.add_category(print_easy);
    fixture.set_valgrind("__none__", "*print_easy_2*");

    let paths = fixture.paths();
    let config = RunConfig::builder().valgrind(true).build();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let result = runner.run(print_easy).await.expect("run category");

    assert_eq!(result.cases[0].outcome, TestOutcome::MatchedConfirmed);
    assert_eq!(result.cases[1].outcome, TestOutcome::MatchedUnconfirmed);
    assert_eq!(result.grade, Grade::new(10, 10));
}

#[tokio::test]
async fn selection_limits_categories() {
    let fixture = Fixture::new().built();
    CATEGORIES.iter().for_each(|category| fixture.add_category(category));

    let selection = Selection {
        clear: true,
        ..Selection::default()
    };
    let checker = Checker::new(fixture.paths(), RunConfig::builder().selection(selection).build());
    let mut board = Scoreboard::new(false);
    checker.run_categories(&mut board).await.expect("run categories");

    let names: Vec<&str> = board.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["clear_easy", "clear_hard"]);
}

#[tokio::test]
async fn missing_reference_is_fatal() {
    let fixture = Fixture::new().built();
    let print_easy = &CATEGORIES[0];
    fixture.add_category(print_easy);
    fs::remove_file(fixture.root.join("output/print_easy_4.ref")).expect("remove reference");

    let paths = fixture.paths();
    let config = RunConfig::default();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let err = runner.run(print_easy).await.expect_err("missing reference");

    assert!(format!("{err:#}").contains("print_easy_4.ref"));
}

#[tokio::test]
async fn log_from_an_earlier_run_is_not_trusted() {
    let fixture = Fixture::new().built();
    let print_easy = &CATEGORIES[0];
    fixture.add_category(print_easy);

    let paths = fixture.paths();
    let config = RunConfig::builder().valgrind(true).build();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let first = runner.run(print_easy).await.expect("first run");
    assert_eq!(first.cases[1].outcome, TestOutcome::MatchedConfirmed);

    fixture.set_valgrind("__none__", "*print_easy_2*");
    let second = runner.run(print_easy).await.expect("second run");

    assert_eq!(second.cases[1].outcome, TestOutcome::MatchedUnconfirmed);
    assert!(!fixture.root.join("valgrind_logs/print_easy_2.log").exists());
    assert_eq!(second.cases[0].outcome, TestOutcome::MatchedConfirmed);
}

#[tokio::test]
async fn diff_is_attached_only_to_mismatches() {
    let fixture = Fixture::new().built();
    let clear_easy = &CATEGORIES[2];
    fixture.add_category(clear_easy);
    fixture.break_reference("clear_easy_1");

    let paths = fixture.paths();
    let config = RunConfig::builder().show_diff(true).build();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let result = runner.run(clear_easy).await.expect("run category");

    let diff = result.cases[0].diff.as_deref().expect("diff for mismatch");
    assert!(diff.contains("Index not in range!"));
    assert!(result.cases[1..].iter().all(|case| case.diff.is_none()));
}

#[tokio::test]
async fn diff_is_skipped_unless_requested() {
    let fixture = Fixture::new().built();
    let clear_easy = &CATEGORIES[2];
    fixture.add_category(clear_easy);
    fixture.break_reference("clear_easy_1");

    let paths = fixture.paths();
    let config = RunConfig::default();
    let runner = SuiteRunner::new(&paths, &config).await.expect("runner");
    let result = runner.run(clear_easy).await.expect("run category");

    assert_eq!(result.cases[0].outcome, TestOutcome::Mismatched);
    assert!(result.cases[0].diff.is_none());
}
