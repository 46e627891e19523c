/*!
# Introductory Tutorial for Tiny BASIC

Run the executable from a terminal. When you see the following you are
ready to go. Press CTRL-D to leave, or type `BYE`.
<pre><code>&nbsp;  TINY BASIC VM, VERSION 0.3.0
&nbsp;  OK
&nbsp;> █
</code></pre>

Stop a running program with CTRL-C.

Tiny BASIC is interactive. The `OK` prompt means it is waiting for a
statement. Lines you type are marked with a "`>`" below. Lowercase is
fine; everything outside quotes is folded to uppercase.

<pre><code>&nbsp;> print "Hello World"
&nbsp;  Hello World
&nbsp;  OK
</code></pre>

A statement typed without a line number runs immediately. This is
direct mode. Put a line number from 1 to 65535 in front and the line
is stored instead. No `OK` follows a stored line.

<pre><code>&nbsp;> 10 PRINT "Hello World"
&nbsp;> 20 GOTO 10
&nbsp;> RUN
&nbsp;  Hello World
&nbsp;  Hello World
&nbsp;  ...
</code></pre>

Press CTRL-C to get `BREAK` and the `OK` prompt back. Typing a line
number by itself deletes that line, and typing a line number that
already exists replaces it.

<pre><code>&nbsp;> 20
&nbsp;> LIST
&nbsp;  10 PRINT "Hello World"
</code></pre>

`LIST` takes an optional range: `LIST 100` shows one line, `LIST 100,200`
shows a range and `LIST 100,` lists to the end. `NEW` erases the
program. `SAVE "NAME.BAS"` writes the listing to a file and
`LOAD "NAME.BAS"` reads it back. Without a name, both use the last
one given.

## Variables

There are 26 numeric variables `A` to `Z` and 26 string variables `A$`
to `Z$`. Numbers start at zero and strings start empty. `LET` is
optional.

```text
LET A = 5
B$ = "FIVE"
PRINT A; " IS "; B$
```

Arrays are made with `DIM` and have one or two dimensions. Subscripts
start at zero. An array used without `DIM` gets 11 elements, 0 to 10.

```text
DIM T(3,3), N$(20)
T(1,2) = 12
```

`RUN` clears every variable and array before starting.

## Expressions

Operators, from loosest to tightest: comparison (`= <> < <= > >=`),
`+ -`, `* / %`, unary minus, then `^` which groups to the right.
Comparisons give 1 or 0. Strings join with `+` and compare by
character.

The numeric functions are `ABS SGN INT FIX CEIL RND SQR EXP LOG SIN
COS TAN ATN DEG RAD`. `RND(N)` gives a whole number from 1 to N, and
`RND(0)` a fraction. `RANDOMIZE` reseeds from the clock and
`RANDOMIZE N` repeats a sequence.

The string functions are `LEN ASC VAL CHR$ STR$ HEX$ UPPER$ LOWER$
MID$ LEFT$ RIGHT$ STRING$`. `TAB(N)` and `SPC(N)` move the cursor
inside `PRINT`.

## Control

```text
10 FOR I = 1 TO 10 STEP 2
20 IF I = 5 THEN PRINT "FIVE" ELSE PRINT I
30 NEXT I
40 GOSUB 100
50 END
100 PRINT "SUBROUTINE"
110 RETURN
```

`IF` takes a statement or a line number after `THEN`, and optionally
an `ELSE`. `GOTO` out of a `FOR` loop is allowed; the loop is dropped
when the next `NEXT` or `RETURN` passes it.

## Input and data

`INPUT` asks with `? ` and, for each further variable, `?? `. A prompt
string may come first: `INPUT "AGE"; A`. Bad numbers get `?REDO`.

`READ` takes values from `DATA` statements in line order. `RESTORE`
starts over, and `RESTORE 100` starts at line 100.

```text
10 DATA 3, "APPLE", 4, "PEAR"
20 READ N, F$
30 PRINT N; " "; F$
```

## Errors

An error prints `?` and its name, with the line when a program was
running, and returns to the `OK` prompt.

<pre><code>&nbsp;> 10 PRINT 1/0
&nbsp;> RUN
&nbsp;  ?DIVISION BY ZERO ERROR AT LINE 10
</code></pre>
*/
