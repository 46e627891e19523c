mod common;
use common::*;

#[test]
fn test_if_then() {
    assert_eq!(exec(&["IF 1=1 THEN PRINT \"ONE\""]), "ONE\n");
    assert_eq!(exec(&["IF 1=2 THEN PRINT \"ONE\""]), "");
    assert_eq!(exec(&["IF 1=1 PRINT \"NO THEN\""]), "NO THEN\n");
}

#[test]
fn test_if_then_else() {
    assert_eq!(
        exec(&["IF 1=1 THEN PRINT \"A\" ELSE PRINT \"B\""]),
        "A\n"
    );
    assert_eq!(
        exec(&["IF 1=2 THEN PRINT \"A\" ELSE PRINT \"B\""]),
        "B\n"
    );
}

#[test]
fn test_else_inside_quotes() {
    assert_eq!(
        exec(&["IF 1=1 THEN PRINT \"ELSE\" ELSE PRINT \"B\""]),
        "ELSE\n"
    );
    assert_eq!(
        exec(&["IF 1=2 THEN PRINT \"ELSE\" ELSE PRINT \"B\""]),
        "B\n"
    );
}

#[test]
fn test_then_line_number() {
    let program = [
        "10 IF X=1 THEN 40 ELSE 30",
        "20 PRINT \"NEVER\"",
        "30 PRINT \"ELSE BRANCH\"",
        "35 END",
        "40 PRINT \"THEN BRANCH\"",
    ];
    let mut lines = program.to_vec();
    lines.push("RUN");
    assert_eq!(exec(&lines), "ELSE BRANCH\n");
    let mut lines = program.to_vec();
    lines[0] = "10 IF X=0 THEN 40 ELSE 30";
    lines.push("RUN");
    assert_eq!(exec(&lines), "THEN BRANCH\n");
}

#[test]
fn test_false_condition_continues_with_next_line() {
    assert_eq!(
        exec(&["10 IF 1>2 THEN PRINT \"NO\"", "20 PRINT \"NEXT\"", "RUN"]),
        "NEXT\n"
    );
}

#[test]
fn test_relations() {
    let cases = [
        ("1=1", true),
        ("1<>1", false),
        ("1<2", true),
        ("2<1", false),
        ("2<=2", true),
        ("3<=2", false),
        ("3>2", true),
        ("2>2", false),
        ("2>=2", true),
        ("1>=2", false),
        ("\"ABC\"<\"ABD\"", true),
        ("\"AB\"<\"ABC\"", true),
        ("\"B\"=\"B\"", true),
        ("\"B\">\"BA\"", false),
    ];
    for (relation, holds) in cases.iter() {
        let line = format!("IF {} THEN PRINT \"YES\" ELSE PRINT \"NO\"", relation);
        let expect = if *holds { "YES\n" } else { "NO\n" };
        assert_eq!(exec(&[line.as_str()]), expect, "{}", relation);
    }
}

#[test]
fn test_mixed_comparison() {
    assert_eq!(
        exec(&["IF 1=\"1\" THEN PRINT \"?\""]),
        "?WRONG VALUE TYPE ERROR\n"
    );
}

#[test]
fn test_then_end_of_statement_checked() {
    assert_eq!(
        exec(&["IF 1=1 THEN PRINT \"A\" OOPS"]),
        "A\n?SYNTAX ERROR\n"
    );
}
