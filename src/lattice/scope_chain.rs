//! Scope chains: nested lexical environments as label-set frames

use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::label::{ObjectLabel, Summarized};

type Frame = BTreeSet<ObjectLabel>;

/// Ordered sequence of object-label sets, innermost frame first.
///
/// The empty chain is represented as `None` at the use sites, so a
/// `ScopeChain` value always has at least the structure it was built with.
/// Two chains are equal iff their frame sequences are framewise equal as
/// label sets. Most chains are short, hence the inline storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeChain {
    frames: SmallVec<[Frame; 2]>,
}

impl ScopeChain {
    /// Create a chain from the given frames, innermost first.
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Create a single-frame chain.
    pub fn single(labels: Frame) -> Self {
        Self::new([labels])
    }

    /// Create a chain with a new innermost frame in front of an outer chain.
    pub fn nested(labels: Frame, outer: Option<&ScopeChain>) -> Self {
        let mut frames = SmallVec::new();
        frames.push(labels);
        if let Some(outer) = outer {
            frames.extend(outer.frames.iter().cloned());
        }
        Self { frames }
    }

    /// The frames of this chain, innermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the chain has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn normalize(self) -> Option<ScopeChain> {
        if self.frames.iter().all(|f| f.is_empty()) {
            None
        } else {
            Some(self)
        }
    }

    /// Framewise union of two chains; the longer tail is kept.
    pub fn add(a: Option<&ScopeChain>, b: Option<&ScopeChain>) -> Option<ScopeChain> {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(a.clone()),
            (None, Some(b)) => Some(b.clone()),
            (Some(a), Some(b)) => {
                let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
                let frames = longer
                    .frames
                    .iter()
                    .enumerate()
                    .map(|(i, frame)| match shorter.frames.get(i) {
                        Some(other) => frame.union(other).copied().collect(),
                        None => frame.clone(),
                    })
                    .collect();
                Some(ScopeChain { frames })
            }
        }
    }

    /// Rewrites every frame through a summarization witness.
    pub fn summarize(chain: Option<&ScopeChain>, s: &Summarized) -> Option<ScopeChain> {
        let chain = chain?;
        let frames = chain.frames.iter().map(|f| s.summarize_set(f)).collect();
        Some(ScopeChain { frames })
    }

    /// Replaces one object label in every frame.
    ///
    /// The cache deduplicates rewrites of chains shared between objects;
    /// callers thread one cache through a whole renaming pass.
    pub fn replace_object_label(
        chain: Option<&ScopeChain>,
        old: ObjectLabel,
        new: ObjectLabel,
        cache: &mut HashMap<ScopeChain, ScopeChain>,
    ) -> Option<ScopeChain> {
        let chain = chain?;
        if let Some(hit) = cache.get(chain) {
            return Some(hit.clone());
        }
        let frames = chain
            .frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|l| if *l == old { new } else { *l })
                    .collect()
            })
            .collect();
        let result = ScopeChain { frames };
        cache.insert(chain.clone(), result.clone());
        Some(result)
    }

    /// Replaces object labels in every frame according to the given map.
    pub fn replace_object_labels(
        chain: Option<&ScopeChain>,
        m: &HashMap<ObjectLabel, ObjectLabel>,
        cache: &mut HashMap<ScopeChain, ScopeChain>,
    ) -> Option<ScopeChain> {
        let chain = chain?;
        if let Some(hit) = cache.get(chain) {
            return Some(hit.clone());
        }
        let frames = chain
            .frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|l| m.get(l).copied().unwrap_or(*l))
                    .collect()
            })
            .collect();
        let result = ScopeChain { frames };
        cache.insert(chain.clone(), result.clone());
        Some(result)
    }

    /// Framewise label-set difference over the common prefix.
    ///
    /// A chain whose frames all end up empty collapses to the empty chain.
    pub fn remove(a: Option<&ScopeChain>, b: Option<&ScopeChain>) -> Option<ScopeChain> {
        let a = a?;
        let b = match b {
            Some(b) => b,
            None => return Some(a.clone()),
        };
        let frames = a
            .frames
            .iter()
            .enumerate()
            .map(|(i, frame)| match b.frames.get(i) {
                Some(other) => frame.difference(other).copied().collect(),
                None => frame.clone(),
            })
            .collect();
        ScopeChain { frames }.normalize()
    }
}

impl fmt::Display for ScopeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{{")?;
            for (j, label) in frame.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", label)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "]")
    }
}
