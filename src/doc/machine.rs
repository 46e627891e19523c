/*!
# The Virtual Machine

The interpreter is a bytecode program. [`crate::lang::basic`]
assembles `basic.asm` into an [`Image`](crate::mach::Image) and
[`Runtime`](crate::mach::Runtime) executes it one opcode at a time.
BASIC source is never compiled; the grammar walks the text of each
line with the `TST` family of opcodes.

## Stacks

 * Control stack: return addresses for `CALL` and `RTN`.
 * Subroutine stack: `GOSUB` return points and `FOR` loop frames.
 * Expression stack: numbers, strings and variable references.

A fault that means the bytecode itself is wrong, like a control stack
underflow, stops the machine with a message like
`!CONTROL STACK UNDERFLOW, PC=12, OPC=2`. BASIC errors are recovered:
the stacks are reset and control returns to the line collector.

## Entry points

An image has two: the line collector (`CO`), where direct mode and
error recovery return to, and the statement executor (`XEC`), where a
running program enters for each line. Execution begins at address 0.

## Encoding

Each instruction is an opcode byte and its operand.

```text
Number       one literal byte             LIT 12
Label        16-bit little-endian address JMP LOOP
LabelString  address, then token bytes    TST S1,'PRINT'
```

The last byte of an inline token has bit 7 set. A saved image is the
code followed by the collector and executor addresses, each 16-bit
little-endian.

## Recognizers

`TST` skips blanks and compares the token against the line. On a match
the cursor moves past it; otherwise control jumps to the label.
`TSTV`, `TSTN`, `TSTL`, `TSTS` and `TSTEOL` recognize a variable, a
number, a line number, a quoted string and the end of a statement.
`SCAN` searches forward for a token outside quotes, which is how `IF`
finds `ELSE`.

`DONE` checks that nothing but blanks remains in the statement, and
runs a hook armed with `ONDONE` first. `NXT` moves to the next
statement or line. The console is checked for a break before every
instruction.

## Host

The machine reaches the outside world only through the
[`Host`](crate::mach::Host) trait: characters in and out, files,
break checks, the clock and floating point exceptions.
[`MemoryHost`](crate::mach::MemoryHost) keeps everything in memory.
*/
