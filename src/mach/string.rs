use std::cell::{Cell, Ref, RefCell};
use std::cmp::Ordering;
use std::ops::Range;
use std::rc::{Rc, Weak};

/// ## BASIC string handle
///
/// Cloning a handle retains the string, dropping it releases it.
/// A static string borrows a range of program text and is emptied
/// when the program is edited.

#[derive(Clone)]
pub struct BasicString(Rc<Node>);

struct Node {
    text: RefCell<Text>,
    releases: Option<Rc<Cell<usize>>>,
}

impl Drop for Node {
    fn drop(&mut self) {
        if let Some(releases) = &self.releases {
            releases.set(releases.get() + 1);
        }
    }
}

enum Text {
    Owned(Box<[u8]>),
    Static { source: Rc<[u8]>, range: Range<usize> },
}

impl BasicString {
    fn new(text: Text, releases: Option<Rc<Cell<usize>>>) -> BasicString {
        BasicString(Rc::new(Node {
            text: RefCell::new(text),
            releases,
        }))
    }

    pub fn bytes(&self) -> Ref<'_, [u8]> {
        Ref::map(self.0.text.borrow(), |text| match text {
            Text::Owned(bytes) => &bytes[..],
            Text::Static { source, range } => &source[range.clone()],
        })
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes().to_vec()
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_static(&self) -> bool {
        matches!(*self.0.text.borrow(), Text::Static { .. })
    }

    pub fn ptr_eq(&self, other: &BasicString) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for BasicString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.bytes()))
    }
}

impl std::fmt::Display for BasicString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes()))
    }
}

/// ## String heap
///
/// Keeps a registry of every string it hands out so static aliases can
/// be found and emptied in bulk. Dropping the last handle to a string
/// counts a release; once there are releases, the dispatch loop calls
/// `collect` to sweep the dead registry entries.

pub struct StringHeap {
    registry: Vec<Weak<Node>>,
    releases: Rc<Cell<usize>>,
    empty: BasicString,
}

impl Default for StringHeap {
    fn default() -> Self {
        StringHeap {
            registry: vec![],
            releases: Rc::new(Cell::new(0)),
            empty: BasicString::new(Text::Owned(Box::new([])), None),
        }
    }
}

impl std::fmt::Debug for StringHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StringHeap {{ live: {} }}", self.live())
    }
}

impl StringHeap {
    pub fn new() -> StringHeap {
        StringHeap::default()
    }

    pub fn empty(&self) -> BasicString {
        self.empty.clone()
    }

    fn register(&mut self, text: Text) -> BasicString {
        let string = BasicString::new(text, Some(self.releases.clone()));
        self.registry.push(Rc::downgrade(&string.0));
        string
    }

    /// A new string owning a copy of `bytes`.
    pub fn alloc(&mut self, bytes: &[u8]) -> BasicString {
        if bytes.is_empty() {
            return self.empty();
        }
        self.register(Text::Owned(bytes.into()))
    }

    /// A static string aliasing `source[range]`.
    pub fn alias(&mut self, source: &Rc<[u8]>, range: Range<usize>) -> BasicString {
        if range.is_empty() {
            return self.empty();
        }
        self.register(Text::Static {
            source: source.clone(),
            range,
        })
    }

    pub fn concatenate(&mut self, lhs: &BasicString, rhs: &BasicString) -> BasicString {
        if rhs.is_empty() {
            return lhs.clone();
        }
        if lhs.is_empty() {
            return rhs.clone();
        }
        let mut bytes = lhs.to_vec();
        bytes.extend_from_slice(&rhs.bytes());
        self.alloc(&bytes)
    }

    /// Bytes `range` of `string`, clamped to its length. A substring of
    /// a static string is static too.
    pub fn substring(&mut self, string: &BasicString, range: Range<usize>) -> BasicString {
        let len = string.len();
        let range = range.start.min(len)..range.end.min(len);
        if range.is_empty() {
            return self.empty();
        }
        let alias = match &*string.0.text.borrow() {
            Text::Static { source, range: whole } => Some((
                source.clone(),
                whole.start + range.start..whole.start + range.end,
            )),
            Text::Owned(_) => None,
        };
        match alias {
            Some((source, range)) => self.alias(&source, range),
            None => self.alloc(&string.bytes()[range]),
        }
    }

    /// Detach a static string from the program text.
    pub fn terminate(&mut self, string: &BasicString) -> BasicString {
        if string.is_static() {
            let bytes = string.to_vec();
            self.alloc(&bytes)
        } else {
            string.clone()
        }
    }

    pub fn compare(lhs: &BasicString, rhs: &BasicString) -> Ordering {
        lhs.bytes()[..].cmp(&rhs.bytes()[..])
    }

    /// Empty every static string. Called whenever program text changes.
    pub fn invalidate_statics(&mut self) {
        for weak in self.registry.iter() {
            if let Some(node) = weak.upgrade() {
                let mut text = node.text.borrow_mut();
                if let Text::Static { .. } = *text {
                    *text = Text::Owned(Box::new([]));
                }
            }
        }
    }

    pub fn needs_collection(&self) -> bool {
        self.releases.get() > 0
    }

    /// Sweep released strings out of the registry.
    pub fn collect(&mut self) -> usize {
        if self.releases.get() == 0 {
            return 0;
        }
        self.releases.set(0);
        let before = self.registry.len();
        self.registry.retain(|weak| weak.strong_count() > 0);
        before - self.registry.len()
    }

    /// Strings handed out and still referenced somewhere.
    pub fn live(&self) -> usize {
        self.registry
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Rc<[u8]> {
        s.as_bytes().into()
    }

    #[test]
    fn test_alias_is_invalidated() {
        let mut heap = StringHeap::new();
        let line = text("PRINT \"HELLO\"\n");
        let hello = heap.alias(&line, 7..12);
        let owned = heap.alloc(b"WORLD");
        assert_eq!(&*hello.bytes(), b"HELLO");
        assert!(hello.is_static());
        heap.invalidate_statics();
        assert!(hello.is_empty());
        assert!(!hello.is_static());
        assert_eq!(&*owned.bytes(), b"WORLD");
    }

    #[test]
    fn test_collect_is_deferred() {
        let mut heap = StringHeap::new();
        let a = heap.alloc(b"A");
        let b = heap.alloc(b"B");
        let ab = heap.concatenate(&a, &b);
        assert_eq!(&*ab.bytes(), b"AB");
        assert!(!heap.needs_collection());
        drop(heap.empty());
        assert!(!heap.needs_collection());
        drop(a);
        drop(b);
        assert_eq!(heap.live(), 1);
        assert!(heap.needs_collection());
        assert_eq!(heap.collect(), 2);
        assert!(!heap.needs_collection());
        assert_eq!(heap.collect(), 0);
        drop(ab);
        assert_eq!(heap.live(), 0);
    }

    #[test]
    fn test_compare() {
        let mut heap = StringHeap::new();
        let abc = heap.alloc(b"ABC");
        let ab = heap.alloc(b"AB");
        let abd = heap.alloc(b"ABD");
        assert_eq!(StringHeap::compare(&ab, &abc), Ordering::Less);
        assert_eq!(StringHeap::compare(&abd, &abc), Ordering::Greater);
        assert_eq!(StringHeap::compare(&abc, &abc.clone()), Ordering::Equal);
    }

    #[test]
    fn test_substring_and_terminate() {
        let mut heap = StringHeap::new();
        let line = text("10 DATA ABCDEF\n");
        let data = heap.alias(&line, 8..14);
        let cd = heap.substring(&data, 2..4);
        assert!(cd.is_static());
        assert_eq!(&*cd.bytes(), b"CD");
        let clamped = heap.substring(&data, 4..99);
        assert_eq!(&*clamped.bytes(), b"EF");
        assert!(heap.substring(&data, 9..12).ptr_eq(&heap.empty()));
        let owned = heap.terminate(&cd);
        assert!(!owned.is_static());
        heap.invalidate_statics();
        assert!(cd.is_empty());
        assert_eq!(&*owned.bytes(), b"CD");
    }
}
