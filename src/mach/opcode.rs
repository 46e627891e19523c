/// ## Virtual machine instruction set
///
/// The machine has no registers. Expressions are evaluated on the
/// expression stack and the BASIC grammar drives itself through the
/// control stack with `CALL` and `RTN`.
///
/// Each opcode is one byte followed by its operand, if any:
///
/// ```text
/// Number       one literal byte
/// Label        16-bit little-endian address
/// LabelString  address, then token bytes; the last has bit 7 set
/// ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Number,
    Label,
    LabelString,
}

impl Operand {
    /// Bytes following the opcode. Tokens add their own length.
    pub fn size(self) -> usize {
        match self {
            Operand::None => 0,
            Operand::Number => 1,
            Operand::Label | Operand::LabelString => 2,
        }
    }
}

macro_rules! opcodes {
    ($($name:ident = $val:literal $operand:ident,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $($name = $val,)*
        }

        impl Opcode {
            pub fn operand(self) -> Operand {
                match self {
                    $(Opcode::$name => Operand::$operand,)*
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Opcode::$name => stringify!($name),)*
                }
            }

            pub fn from_mnemonic(s: &str) -> Option<Opcode> {
                match s {
                    $(stringify!($name) => Some(Opcode::$name),)*
                    _ => None,
                }
            }
        }

        impl TryFrom<u8> for Opcode {
            type Error = u8;
            fn try_from(byte: u8) -> Result<Opcode, u8> {
                match byte {
                    $($val => Ok(Opcode::$name),)*
                    _ => Err(byte),
                }
            }
        }
    };
}

opcodes! {
    TST = 0 LabelString,
    CALL = 1 Label,
    RTN = 2 None,
    DONE = 3 None,
    JMP = 4 Label,
    PRS = 5 None,
    PRN = 6 None,
    SPC = 7 None,
    NLINE = 8 None,
    NXT = 9 None,
    XFER = 10 None,
    SAV = 11 None,
    RSTR = 12 None,
    CMPR = 13 None,
    LIT = 14 Number,
    INNUM = 15 None,
    FIN = 16 None,
    ERR = 17 None,
    ADD = 18 None,
    SUB = 19 None,
    NEG = 20 None,
    MUL = 21 None,
    DIV = 22 None,
    STORE = 23 None,
    TSTV = 24 Label,
    TSTN = 25 Label,
    IND = 26 None,
    LST = 27 None,
    INIT = 28 None,
    GETLINE = 29 None,
    TSTL = 30 Label,
    INSRT = 31 None,
    XINIT = 32 None,
    RUN = 33 None,
    EXIT = 34 None,
    CMPRX = 35 Label,
    FOR = 36 None,
    STEP = 37 None,
    NXTFOR = 38 None,
    MOD = 39 None,
    POW = 40 None,
    RND = 41 None,
    ABS = 42 None,
    TSTEOL = 43 Label,
    TSTS = 44 Label,
    STR = 45 None,
    VAL = 46 None,
    HEX = 47 None,
    CPY = 48 None,
    LSTX = 49 None,
    STRLEN = 50 None,
    ASC = 51 None,
    CHR = 52 None,
    FIX = 53 None,
    SGN = 54 None,
    SCAN = 55 LabelString,
    ONDONE = 56 Label,
    ADVEOL = 57 None,
    INVAR = 58 None,
    POP = 59 None,
    LDPRG = 60 None,
    SVPRG = 61 None,
    DONEM = 62 Number,
    SRND = 63 None,
    FLR = 64 None,
    CEIL = 65 None,
    ATN = 66 None,
    COS = 67 None,
    SIN = 68 None,
    TAN = 69 None,
    EXP = 70 None,
    LOG = 71 None,
    SQR = 72 None,
    MKS = 73 None,
    SBSTR = 74 None,
    TSTSOL = 75 Label,
    NXTLN = 76 Label,
    DMODE = 77 Number,
    DSTORE = 78 None,
    DIM = 79 None,
    ARRY = 80 None,
    ADVCRS = 81 Number,
    DEGRAD = 82 Number,
    UPRLWR = 83 Number,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(Opcode::try_from(0), Ok(Opcode::TST));
        assert_eq!(Opcode::try_from(83), Ok(Opcode::UPRLWR));
        assert_eq!(Opcode::try_from(84), Err(84));
        assert_eq!(Opcode::try_from(255), Err(255));
    }

    #[test]
    fn test_every_byte_agrees() {
        for byte in 0..=83u8 {
            let op = Opcode::try_from(byte).unwrap();
            assert_eq!(op as u8, byte);
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
        }
    }

    #[test]
    fn test_operands() {
        assert_eq!(Opcode::SCAN.operand(), Operand::LabelString);
        assert_eq!(Opcode::NXTLN.operand(), Operand::Label);
        assert_eq!(Opcode::DEGRAD.operand(), Operand::Number);
        assert_eq!(Opcode::DSTORE.operand(), Operand::None);
        assert_eq!(Opcode::LIT.operand().size(), 1);
        assert_eq!(Opcode::from_mnemonic("tst"), None);
    }
}
