//! Search fingers.
//!
//! A finger array remembers, for one key X, the rightmost position strictly
//! before X at every level. When the next search target lies close to X, the
//! search can start low in the list from a cached finger instead of
//! descending from the top of the head sentinel.
//!
//! A cached array is only a safe starting point while it still describes the
//! list correctly for some key. The skiplist upholds that by only committing
//! arrays produced by a complete [`locate`] on the current structure (see
//! `SkipList` for how writers keep both of its caches coherent).

use std::ops::{Index, IndexMut};

use crate::arena::{Arena, Pos};
use crate::compare::Comparator;
use crate::error::Result;

/// One cached position per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fingers(Vec<Pos>);

impl Fingers {
    /// A cache with nothing in it. Every slot is the head, which makes the
    /// next [`locate`] start from the top.
    pub(crate) fn new(levels: usize) -> Self {
        Self(vec![Pos::Head; levels])
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Grows the array to `levels`; new slots point at the head.
    pub(crate) fn reserve_levels(&mut self, levels: usize) {
        if levels > self.0.len() {
            self.0.resize(levels, Pos::Head);
        }
    }
}

impl Index<usize> for Fingers {
    type Output = Pos;

    fn index(&self, level: usize) -> &Pos {
        &self.0[level]
    }
}

impl IndexMut<usize> for Fingers {
    fn index_mut(&mut self, level: usize) -> &mut Pos {
        &mut self.0[level]
    }
}

/// Rewrites `fingers[0..height]` with the rightmost position strictly before
/// `target` at every level.
///
/// On a comparator error the levels already visited have been overwritten,
/// so callers pass a working copy and commit it only on success.
///
/// # Panics
/// - if `height` is zero or larger than `fingers.len()`.
pub(crate) fn locate<K, V, C>(
    arena: &Arena<K, V>,
    height: usize,
    cmp: &C,
    target: &K,
    fingers: &mut Fingers,
) -> Result<()>
where
    C: Comparator<K> + ?Sized,
{
    assert!(
        height > 0 && height <= fingers.len(),
        "invalid height {} for {} fingers",
        height,
        fingers.len()
    );

    let (mut level, mut pos) = start_point(arena, height, cmp, target, fingers)?;
    trace!(level, ?pos, "descending from finger");

    loop {
        while let Some(next) = arena.next(pos, level) {
            if !cmp.before(arena[next].key(), target)? {
                break;
            }
            pos = Pos::Node(next);
        }
        fingers[level] = pos;

        if level == 0 {
            return Ok(());
        }
        level -= 1;
    }
}

/// Picks the level and position the downward pass starts from.
///
/// Every finger above the returned level is already correct for `target`,
/// so the descent only has to fix the levels at and below it.
fn start_point<K, V, C>(
    arena: &Arena<K, V>,
    height: usize,
    cmp: &C,
    target: &K,
    fingers: &Fingers,
) -> Result<(usize, Pos)>
where
    C: Comparator<K> + ?Sized,
{
    let top = (height - 1, Pos::Head);
    let Pos::Node(base) = fingers[0] else {
        return Ok(top);
    };

    if cmp.before(arena[base].key(), target)? {
        // Target is to the right of the cache. Climb while the successor at
        // the next level is still before the target; the first level whose
        // successor is not bounds every level above it as well.
        let mut level = 1;
        while level < height {
            let Some(next) = arena.next(fingers[level], level) else {
                break;
            };
            if !cmp.before(arena[next].key(), target)? {
                break;
            }
            level += 1;
        }
        Ok((level - 1, fingers[level - 1]))
    } else {
        // Target is at or to the left of the cache. The lowest level whose
        // finger is still before the target is a valid start, and the
        // successors above it are all past the old key, hence past the target.
        for level in 1..height {
            match fingers[level] {
                Pos::Head => return Ok((level, Pos::Head)),
                Pos::Node(id) => {
                    if cmp.before(arena[id].key(), target)? {
                        return Ok((level, fingers[level]));
                    }
                }
            }
        }
        Ok(top)
    }
}
