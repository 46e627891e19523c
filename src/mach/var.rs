use super::number::{self, Number};
use super::{BasicString, Exception, Fault, Val, DEFAULT_DIMENSION};
use crate::error;

type Result<T> = std::result::Result<T, Exception>;

const LETTERS: usize = 26;
const MAX_ELEMENTS: usize = i32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Number,
    String,
}

/// ## Variable reference
///
/// Names a scalar (`A`, `A$`) or one element of an array. Arrays live
/// in their own namespace, so `A` and `A(1)` are unrelated.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarRef {
    kind: Kind,
    letter: u8,
    element: Option<usize>,
}

impl VarRef {
    /// `letter` is 0 for A through 25 for Z.
    pub fn scalar(kind: Kind, letter: u8) -> VarRef {
        debug_assert!((letter as usize) < LETTERS);
        VarRef {
            kind,
            letter,
            element: None,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn letter(&self) -> u8 {
        self.letter
    }

    pub fn is_element(&self) -> bool {
        self.element.is_some()
    }

    fn slot(&self) -> usize {
        match self.kind {
            Kind::Number => self.letter as usize,
            Kind::String => LETTERS + self.letter as usize,
        }
    }
}

impl std::fmt::Display for VarRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'A' + self.letter) as char)?;
        if self.kind == Kind::String {
            write!(f, "$")?;
        }
        if let Some(element) = self.element {
            write!(f, "[{}]", element)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Dim {
    nelem: usize,
    idxsize: usize,
}

#[derive(Debug)]
struct Array {
    dims: Vec<Dim>,
    elems: Vec<Val>,
}

/// ## Variable memory

#[derive(Debug)]
pub struct Var {
    scalars: Vec<Val>,
    arrays: Vec<Option<Array>>,
}

impl Var {
    pub fn new(empty: &BasicString) -> Var {
        let mut var = Var {
            scalars: vec![],
            arrays: vec![],
        };
        var.clear(empty);
        var
    }

    /// Zero the numbers, empty the strings, forget the arrays.
    pub fn clear(&mut self, empty: &BasicString) {
        self.scalars.clear();
        self.scalars
            .extend((0..LETTERS).map(|_| Val::Number(number::from_int(0))));
        self.scalars
            .extend((0..LETTERS).map(|_| Val::String(empty.clone())));
        self.arrays.clear();
        self.arrays.resize_with(LETTERS * 2, || None);
    }

    fn slot(&self, var: VarRef) -> Result<&Val> {
        let val = match var.element {
            None => self.scalars.get(var.slot()),
            Some(element) => self.arrays[var.slot()]
                .as_ref()
                .and_then(|array| array.elems.get(element)),
        };
        val.ok_or_else(|| Fault::BadVarAddress.into())
    }

    fn slot_mut(&mut self, var: VarRef) -> Result<&mut Val> {
        let val = match var.element {
            None => self.scalars.get_mut(var.slot()),
            Some(element) => self.arrays[var.slot()]
                .as_mut()
                .and_then(|array| array.elems.get_mut(element)),
        };
        val.ok_or_else(|| Fault::BadVarAddress.into())
    }

    pub fn fetch(&self, var: VarRef) -> Result<Val> {
        Ok(self.slot(var)?.clone())
    }

    pub fn store(&mut self, var: VarRef, value: Val) -> Result<()> {
        let slot = self.slot_mut(var)?;
        let same_kind = matches!(
            (&*slot, &value),
            (Val::Number(_), Val::Number(_)) | (Val::String(_), Val::String(_))
        );
        if !same_kind {
            return Err(error!(WrongValueType).into());
        }
        *slot = value;
        Ok(())
    }

    pub fn store_number(&mut self, var: VarRef, n: Number) -> Result<()> {
        self.store(var, Val::Number(n))
    }

    pub fn fetch_number(&self, var: VarRef) -> Result<Number> {
        match self.slot(var)? {
            Val::Number(n) => Ok(*n),
            _ => Err(error!(WrongValueType).into()),
        }
    }

    /// Allocate the array named by `var`. `max` holds the largest
    /// subscript of each dimension.
    pub fn dimension(&mut self, var: VarRef, max: &[i32], empty: &BasicString) -> Result<()> {
        if self.arrays[var.slot()].is_some() {
            return Err(error!(RedimensionedArray).into());
        }
        let mut nelem = Vec::with_capacity(max.len());
        for &m in max {
            if m < 0 {
                return Err(error!(IllegalQuantity).into());
            }
            nelem.push(m as usize + 1);
        }
        self.allocate(var, &nelem, empty)
    }

    fn allocate(&mut self, var: VarRef, nelem: &[usize], empty: &BasicString) -> Result<()> {
        if nelem.is_empty() {
            return Err(error!(BadSubscript).into());
        }
        let mut dims: Vec<Dim> = nelem
            .iter()
            .map(|&nelem| Dim { nelem, idxsize: 0 })
            .collect();
        let mut total: usize = 1;
        for dim in dims.iter_mut().rev() {
            dim.idxsize = total;
            total = match total.checked_mul(dim.nelem) {
                Some(t) if t <= MAX_ELEMENTS => t,
                _ => return Err(error!(OutOfMemory).into()),
            };
        }
        let mut elems = Vec::new();
        if elems.try_reserve_exact(total).is_err() {
            return Err(error!(OutOfMemory).into());
        }
        let init = match var.kind {
            Kind::Number => Val::Number(number::from_int(0)),
            Kind::String => Val::String(empty.clone()),
        };
        elems.resize(total, init);
        self.arrays[var.slot()] = Some(Array { dims, elems });
        Ok(())
    }

    /// Reference to one array element, dimensioning the array with
    /// the default extent on first use.
    pub fn element(&mut self, var: VarRef, subscripts: &[i32], empty: &BasicString) -> Result<VarRef> {
        if subscripts.iter().any(|&s| s < 0) {
            return Err(error!(IllegalQuantity).into());
        }
        if self.arrays[var.slot()].is_none() {
            let nelem = vec![DEFAULT_DIMENSION; subscripts.len()];
            self.allocate(var, &nelem, empty)?;
        }
        let array = match &self.arrays[var.slot()] {
            Some(array) => array,
            None => return Err(Fault::BadDimension.into()),
        };
        if array.dims.len() != subscripts.len() {
            return Err(error!(BadSubscript).into());
        }
        let mut offset = 0;
        for (dim, &sub) in array.dims.iter().zip(subscripts) {
            let sub = sub as usize;
            if sub >= dim.nelem {
                return Err(error!(BadSubscript).into());
            }
            offset += sub * dim.idxsize;
        }
        if offset >= array.elems.len() {
            return Err(Fault::BadVarAddress.into());
        }
        Ok(VarRef {
            kind: var.kind,
            letter: var.letter,
            element: Some(offset),
        })
    }
}
