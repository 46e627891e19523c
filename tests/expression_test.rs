mod common;
use basic::mach::MemoryHost;
use common::*;

#[test]
fn test_precedence() {
    assert_eq!(exec(&["PRINT 2+3*4"]), "14\n");
    assert_eq!(exec(&["PRINT (2+3)*4"]), "20\n");
    assert_eq!(exec(&["PRINT 10-2-3"]), "5\n");
    assert_eq!(exec(&["PRINT 7%3"]), "1\n");
    assert_eq!(exec(&["PRINT +5"]), "5\n");
    assert_eq!(exec(&["PRINT -2^2"]), "-4\n");
    assert_eq!(exec(&["PRINT 2*-3"]), "?SYNTAX ERROR\n");
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(exec(&["PRINT 2^3^2"]), "512\n");
    assert_eq!(exec(&["PRINT (2^3)^2"]), "64\n");
}

#[test]
#[cfg(not(feature = "integer"))]
fn test_floating_point() {
    assert_eq!(exec(&["PRINT 7/2"]), "3.5\n");
    assert_eq!(exec(&["PRINT 2^-1"]), "0.5\n");
    assert_eq!(exec(&["PRINT 1/3"]), "0.333333333\n");
    assert_eq!(exec(&["PRINT 1E3"]), "1000\n");
    assert_eq!(exec(&["PRINT 123456789*10"]), "1.23456789E+09\n");
    assert_eq!(exec(&["PRINT 0.001"]), "1.00000000E-03\n");
    assert_eq!(exec(&["PRINT .5+.25"]), "0.75\n");
}

#[test]
#[cfg(feature = "integer")]
fn test_integer_division() {
    assert_eq!(exec(&["PRINT 7/2"]), "3\n");
    assert_eq!(exec(&["PRINT -7/2"]), "-3\n");
}

#[test]
fn test_division_by_zero_leaves_clean_stacks() {
    let mut r = runtime(&["PRINT 1+2*(3/0)"]);
    assert_eq!(run(&mut r), "?DIVISION BY ZERO ERROR\n");
    assert_eq!(r.depths(), Default::default());

    let mut r = runtime(&["10 A=5", "20 B=A%0", "RUN"]);
    assert_eq!(run(&mut r), "?DIVISION BY ZERO ERROR AT LINE 20\n");
    assert_eq!(r.depths(), Default::default());
}

#[test]
fn test_error_releases_string_temporaries() {
    let mut r = runtime(&["A$=\"X\"", "PRINT \"A\"+\"B\"+STR$(1/0)"]);
    assert_eq!(run(&mut r), "?DIVISION BY ZERO ERROR\n");
    assert_eq!(r.strings().live(), 1);
    assert_eq!(r.depths(), Default::default());
}

#[test]
fn test_statement_releases_string_temporaries() {
    let mut r = runtime(&[
        "A$=\"X\"",
        "B$=A$+\"Y\"",
        "PRINT LEFT$(B$+\"ZZ\",3);STR$(12)+A$",
    ]);
    assert_eq!(run(&mut r), "XYZ12X\n");
    assert_eq!(r.strings().live(), 2);
    assert_eq!(r.depths(), Default::default());
}

#[test]
fn test_new_and_load_release_program_strings() {
    let mut r = runtime(&["10 A$=\"HELLO\"", "20 B$=LEFT$(A$,2)", "RUN"]);
    assert_eq!(run(&mut r), "");
    assert_eq!(r.strings().live(), 2);
    let mut r = runtime(&["10 A$=\"HELLO\"", "20 B$=LEFT$(A$,2)", "RUN", "NEW"]);
    run(&mut r);
    assert_eq!(r.strings().live(), 0);

    let mut host = MemoryHost::new();
    host.set_file("EMPTY.BAS", "10 END\n");
    let mut r = runtime_with(
        host,
        &["10 A$=\"HELLO\"", "20 B$=A$+\"!\"", "RUN", "LOAD \"EMPTY.BAS\""],
    );
    assert_eq!(run(&mut r), "");
    assert_eq!(r.strings().live(), 0);
    assert_eq!(r.depths(), Default::default());
}

#[test]
fn test_expression_too_complex() {
    let line = format!("PRINT {}1{}", "(".repeat(20), ")".repeat(20));
    let mut r = runtime(&[line.as_str()]);
    assert_eq!(run(&mut r), "?EXPRESSION TOO COMPLEX ERROR\n");
    assert_eq!(r.depths(), Default::default());
    let line = format!("PRINT {}1{}", "(".repeat(10), ")".repeat(10));
    assert_eq!(exec(&[line.as_str()]), "1\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(exec(&["A$=\"AB\"", "PRINT A$+\"CD\"+A$"]), "ABCDAB\n");
    assert_eq!(exec(&["PRINT \"\"+\"X\"+\"\""]), "X\n");
    assert_eq!(exec(&["PRINT \"A\"-\"B\""]), "?WRONG VALUE TYPE ERROR\n");
}

#[test]
fn test_static_strings_invalidated_by_edit() {
    assert_eq!(
        exec(&[
            "10 A$=\"HELLO\"",
            "20 B$=A$+\"!\"",
            "RUN",
            "PRINT A$;B$",
            "10 A$=\"BYE\"",
            "PRINT \"[\";A$;\"]\";B$",
        ]),
        "HELLOHELLO!\n[]HELLO!\n"
    );
}

#[test]
fn test_direct_strings_survive_edits() {
    assert_eq!(
        exec(&["A$=\"TYPED\"", "10 PRINT 1", "PRINT A$"]),
        "TYPED\n"
    );
}
