mod common;
use common::*;

fn print(expr: &str) -> String {
    let line = format!("PRINT {}", expr);
    exec(&[line.as_str()])
}

#[test]
fn test_string_functions() {
    assert_eq!(print("LEN(\"HELLO\")"), "5\n");
    assert_eq!(print("LEN(\"\")"), "0\n");
    assert_eq!(print("MID$(\"HELLO\",2,3)"), "ELL\n");
    assert_eq!(print("MID$(\"HELLO\",2)"), "ELLO\n");
    assert_eq!(print("MID$(\"HELLO\",4,10)"), "LO\n");
    assert_eq!(print("\"[\";MID$(\"HI\",5);\"]\""), "[]\n");
    assert_eq!(print("LEFT$(\"HELLO\",2)"), "HE\n");
    assert_eq!(print("RIGHT$(\"HELLO\",2)"), "LO\n");
    assert_eq!(print("RIGHT$(\"HELLO\",9)"), "HELLO\n");
    assert_eq!(print("MID$(\"HELLO\",0,1)"), "?ILLEGAL QUANTITY ERROR\n");
}

#[test]
fn test_character_codes() {
    assert_eq!(print("CHR$(65)"), "A\n");
    assert_eq!(print("ASC(\"ABC\")"), "65\n");
    assert_eq!(print("ASC(\"\")"), "0\n");
    assert_eq!(print("CHR$(256)"), "?ILLEGAL QUANTITY ERROR\n");
    assert_eq!(print("STRING$(3,\"*\")"), "***\n");
    assert_eq!(print("STRING$(2,66)"), "BB\n");
    assert_eq!(print("STRING$(0,66)"), "?ILLEGAL QUANTITY ERROR\n");
}

#[test]
fn test_conversions() {
    assert_eq!(print("STR$(12)+\"!\""), "12!\n");
    assert_eq!(print("VAL(\"42\")+1"), "43\n");
    assert_eq!(print("VAL(\"  7X\")"), "7\n");
    assert_eq!(print("VAL(\"X\")"), "0\n");
    assert_eq!(print("HEX$(255)"), "FF\n");
    assert_eq!(print("HEX$(4095)"), "0FFF\n");
    assert_eq!(print("HEX$(-1)"), "?ILLEGAL QUANTITY ERROR\n");
    assert_eq!(print("UPPER$(\"abc\")"), "ABC\n");
    assert_eq!(print("LOWER$(\"ABC\")"), "abc\n");
}

#[test]
fn test_val_of_program_text() {
    assert_eq!(
        exec(&["10 A$=\"123\"", "20 PRINT VAL(A$)*2", "RUN"]),
        "246\n"
    );
}

#[test]
fn test_integer_functions() {
    assert_eq!(print("ABS(-3)"), "3\n");
    assert_eq!(print("ABS(3)"), "3\n");
    assert_eq!(print("SGN(-2)"), "-1\n");
    assert_eq!(print("SGN(0)"), "0\n");
    assert_eq!(print("SGN(9)"), "1\n");
    assert_eq!(print("ABS(\"X\")"), "?WRONG VALUE TYPE ERROR\n");
}

#[test]
#[cfg(not(feature = "integer"))]
fn test_math_functions() {
    assert_eq!(print("INT(-2.5)"), "-3\n");
    assert_eq!(print("FIX(-2.5)"), "-2\n");
    assert_eq!(print("CEIL(2.1)"), "3\n");
    assert_eq!(print("SQR(16)"), "4\n");
    assert_eq!(print("EXP(0)"), "1\n");
    assert_eq!(print("LOG(1)"), "0\n");
    assert_eq!(print("SIN(0)"), "0\n");
    assert_eq!(print("COS(0)"), "1\n");
    assert_eq!(print("TAN(0)"), "0\n");
    assert_eq!(print("ATN(0)"), "0\n");
    assert_eq!(print("DEG(RAD(180))"), "180\n");
    assert_eq!(print("SQR(-1)"), "?ARITHMETIC EXCEPTION ERROR\n");
    assert_eq!(print("LOG(0)"), "?DIVISION BY ZERO ERROR\n");
}

#[test]
#[cfg(not(feature = "integer"))]
fn test_rnd_fraction() {
    assert_eq!(
        exec(&[
            "10 FOR I=1 TO 100",
            "20 X=RND(0)",
            "30 IF X<0 THEN PRINT \"LOW\"",
            "40 IF X>=1 THEN PRINT \"HIGH\"",
            "50 NEXT I",
            "RUN",
        ]),
        ""
    );
}

#[test]
fn test_tab_and_spc() {
    assert_eq!(print("\"A\";TAB(5);\"B\""), "A    B\n");
    assert_eq!(print("\"ABCDEF\";TAB(2);\"B\""), "ABCDEFB\n");
    assert_eq!(print("\"A\";SPC(3);\"B\""), "A   B\n");
    assert_eq!(print("\"A\";TAB(-1)"), "A\n?ILLEGAL QUANTITY ERROR\n");
}

#[test]
fn test_function_names_are_not_variables() {
    assert_eq!(exec(&["A=-4", "PRINT ABS(A)+A"]), "0\n");
}
