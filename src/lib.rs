//! # tst-rs
//!
//! A string-keyed in-memory map with prefix and wildcard search, backed by a
//! ternary search tree (TST).
//!
//! Based on the structure described by Jon Bentley and Bob Sedgewick in
//! "Ternary Search Trees" (Dr. Dobb's Journal, 1998).
//!
//! ## Example
//!
//! ```rust
//! use tst_rs::TernaryTree;
//!
//! let mut tree: TernaryTree<u32> = TernaryTree::new();
//! tree.insert("cat", 1);
//! tree.insert("cart", 2);
//!
//! assert_eq!(tree.get("cat"), Some(&1));
//! assert_eq!(tree.prefix("ca"), vec!["cart", "cat"]);
//! ```

// =============================================================================
// Node arena
// =============================================================================

/// Sentinel index for a missing child.
const NIL: u32 = u32::MAX;

/// The root always occupies slot 0 of the arena.
const ROOT: u32 = 0;

/// One character position along some set of inserted keys.
///
/// `lo` and `hi` hold alternatives for the *same* position; `eq` advances to
/// the next position. An occupied `value` slot is the only signal that the
/// characters spelled out by the `eq` path from the root down to this node
/// form a complete stored key.
#[derive(Clone)]
struct Node<V> {
    ch: char,
    lo: u32,
    eq: u32,
    hi: u32,
    value: Option<V>,
}

impl<V> Node<V> {
    #[inline]
    fn new(ch: char) -> Self {
        Self {
            ch,
            lo: NIL,
            eq: NIL,
            hi: NIL,
            value: None,
        }
    }
}

// =============================================================================
// TernaryTree
// =============================================================================

/// A string-keyed map with exact lookup, prefix enumeration, and limited
/// wildcard matching.
///
/// Each node splits on a single character: keys whose current character
/// sorts below the node's go left, above go right, and matching characters
/// advance one position through the middle child. Keys that share long
/// common substrings therefore share nodes, and every step of a lookup
/// compares exactly one character.
///
/// Nodes live in a flat arena and are referenced by index; the root is
/// allocated up front at a fixed slot and carries no character of its own.
/// There is no remove operation, so nodes are never deallocated
/// individually; the whole arena is dropped with the tree.
#[derive(Clone)]
pub struct TernaryTree<V> {
    nodes: Vec<Node<V>>,
    /// Number of nodes whose value slot is occupied.
    len: usize,
}

impl<V> TernaryTree<V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new('\0')],
            len: 0,
        }
    }

    /// Number of stored keys. Overwriting an existing key does not change
    /// this.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no key has been stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Releases excess arena capacity.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    fn alloc(&mut self, ch: char) -> u32 {
        let idx = self.nodes.len() as u32;
        debug_assert!(idx < NIL);
        self.nodes.push(Node::new(ch));
        idx
    }

    /// Inserts `key` with `value`, overwriting any previous value for it.
    ///
    /// Returns `false` and leaves the tree untouched iff `key` is empty.
    pub fn insert(&mut self, key: &str, value: V) -> bool {
        let mut chars = key.chars();
        let mut c = match chars.next() {
            Some(c) => c,
            None => return false,
        };

        let mut cur = ROOT;
        loop {
            let ch = self.nodes[cur as usize].ch;
            if c < ch {
                let mut lo = self.nodes[cur as usize].lo;
                if lo == NIL {
                    lo = self.alloc(c);
                    self.nodes[cur as usize].lo = lo;
                }
                cur = lo;
            } else if c > ch {
                let mut hi = self.nodes[cur as usize].hi;
                if hi == NIL {
                    hi = self.alloc(c);
                    self.nodes[cur as usize].hi = hi;
                }
                cur = hi;
            } else if let Some(next) = chars.next() {
                let mut eq = self.nodes[cur as usize].eq;
                if eq == NIL {
                    eq = self.alloc(next);
                    self.nodes[cur as usize].eq = eq;
                }
                c = next;
                cur = eq;
            } else {
                if self.nodes[cur as usize].value.replace(value).is_none() {
                    self.len += 1;
                }
                return true;
            }
        }
    }

    /// Returns the value stored for `key`, if any.
    ///
    /// An empty key, and a string that only exists as a prefix of stored
    /// keys, both come back as `None`.
    pub fn get(&self, key: &str) -> Option<&V> {
        let idx = self.locate(key)?;
        self.nodes[idx as usize].value.as_ref()
    }

    /// Returns `true` if `key` was inserted.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Walks the path spelled by `key`, following existing nodes only.
    ///
    /// Returns the node at which the walk consumed the whole string, whether
    /// or not that node holds a value.
    fn locate(&self, key: &str) -> Option<u32> {
        let mut chars = key.chars();
        let mut c = chars.next()?;
        let mut cur = ROOT;
        while cur != NIL {
            let node = &self.nodes[cur as usize];
            if c < node.ch {
                cur = node.lo;
            } else if c > node.ch {
                cur = node.hi;
            } else {
                match chars.next() {
                    Some(next) => {
                        c = next;
                        cur = node.eq;
                    }
                    None => return Some(cur),
                }
            }
        }
        None
    }

    // =========================================================================
    // Prefix scan
    // =========================================================================

    /// Returns every stored key that starts with `prefix`, in lexicographic
    /// order.
    ///
    /// An empty prefix, or one that no stored key starts with, yields an
    /// empty vector. The prefix itself is included when it is a stored key.
    pub fn prefix(&self, prefix: &str) -> Vec<String> {
        let mut matches = Vec::new();
        let idx = match self.locate(prefix) {
            Some(idx) => idx,
            None => return matches,
        };
        if self.nodes[idx as usize].value.is_some() {
            matches.push(prefix.to_owned());
        }
        let mut buf = String::from(prefix);
        self.collect(self.nodes[idx as usize].eq, &mut buf, &mut matches);
        matches
    }

    /// In-order walk (`lo`, self, `eq`, `hi`); records `buf` plus the path
    /// at every valued node. `lo` covers strictly smaller characters and
    /// `hi` strictly larger ones at each position, so output is
    /// lexicographic by construction.
    fn collect(&self, idx: u32, buf: &mut String, matches: &mut Vec<String>) {
        if idx == NIL {
            return;
        }
        let node = &self.nodes[idx as usize];
        self.collect(node.lo, buf, matches);
        buf.push(node.ch);
        if node.value.is_some() {
            matches.push(buf.clone());
        }
        self.collect(node.eq, buf, matches);
        buf.pop();
        self.collect(node.hi, buf, matches);
    }

    // =========================================================================
    // Wildcard matching
    // =========================================================================

    /// Returns every stored key matching `pattern`, where `_` matches
    /// exactly one character and a single trailing `*` matches any suffix
    /// (equivalent to [`prefix`](Self::prefix) on the part before it).
    ///
    /// ```rust
    /// # use tst_rs::TernaryTree;
    /// let mut tree = TernaryTree::new();
    /// for word in ["runs", "rank", "rent", "ran"] {
    ///     tree.insert(word, ());
    /// }
    /// assert_eq!(tree.matches("r_n_"), vec!["rank", "rent", "runs"]);
    /// assert_eq!(tree.matches("ran*"), vec!["ran", "rank"]);
    /// ```
    ///
    /// Any other placement or multiplicity of `*` (including a trailing
    /// `*` combined with `_`) is unsupported and yields no matches;
    /// general mid-pattern wildcards are out of scope.
    pub fn matches(&self, pattern: &str) -> Vec<String> {
        if pattern.is_empty() {
            return Vec::new();
        }
        // No wildcards: an exact lookup is cheaper than a traversal.
        if !pattern.contains(['_', '*']) {
            return if self.contains_key(pattern) {
                vec![pattern.to_owned()]
            } else {
                Vec::new()
            };
        }
        // "word*" is just a prefix query.
        if let Some(stem) = pattern.strip_suffix('*') {
            return if stem.contains(['_', '*']) {
                Vec::new()
            } else {
                self.prefix(stem)
            };
        }
        if pattern.contains('*') {
            return Vec::new();
        }

        let pat: Vec<char> = pattern.chars().collect();
        let mut buf = String::new();
        let mut matches = Vec::new();
        self.collect_matches(ROOT, &pat, &mut buf, &mut matches);
        matches
    }

    /// Three-way traversal where `_` fans out across all branches instead of
    /// steering. A match is recorded when the pattern runs out exactly at a
    /// valued node.
    fn collect_matches(&self, idx: u32, pat: &[char], buf: &mut String, matches: &mut Vec<String>) {
        if idx == NIL {
            return;
        }
        let node = &self.nodes[idx as usize];
        let c = pat[0];
        if c == '_' || c < node.ch {
            self.collect_matches(node.lo, pat, buf, matches);
        }
        if c == '_' || c == node.ch {
            buf.push(node.ch);
            if pat.len() > 1 {
                self.collect_matches(node.eq, &pat[1..], buf, matches);
            } else if node.value.is_some() {
                matches.push(buf.clone());
            }
            buf.pop();
        }
        if c == '_' || c > node.ch {
            self.collect_matches(node.hi, pat, buf, matches);
        }
    }
}

// =============================================================================
// Iteration
// =============================================================================

impl<V> TernaryTree<V> {
    /// Iterates over all `(key, value)` pairs in lexicographic key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tree: self,
            stack: vec![Frame::Explore(ROOT, String::new())],
        }
    }
}

enum Frame {
    /// Visit a subtree; the string is the key prefix above it.
    Explore(u32, String),
    /// Yield this node's value under the finished key.
    Emit(u32, String),
}

/// Lexicographic iterator over a [`TernaryTree`], driven by an explicit
/// frame stack.
pub struct Iter<'a, V> {
    tree: &'a TernaryTree<V>,
    stack: Vec<Frame>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Explore(idx, prefix) => {
                    let node = &self.tree.nodes[idx as usize];
                    let mut key = prefix.clone();
                    key.push(node.ch);
                    // Pushed in reverse of visit order: lo, self, eq, hi.
                    if node.hi != NIL {
                        self.stack.push(Frame::Explore(node.hi, prefix.clone()));
                    }
                    if node.eq != NIL {
                        self.stack.push(Frame::Explore(node.eq, key.clone()));
                    }
                    self.stack.push(Frame::Emit(idx, key));
                    if node.lo != NIL {
                        self.stack.push(Frame::Explore(node.lo, prefix));
                    }
                }
                Frame::Emit(idx, key) => {
                    if let Some(ref value) = self.tree.nodes[idx as usize].value {
                        return Some((key, value));
                    }
                }
            }
        }
        None
    }
}

impl<V> Default for TernaryTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for TernaryTree<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
