use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::arena::{Arena, NodeId, Pos};
use crate::compare::{Ascending, Comparator};
use crate::cursor::{Cursor, Entry};
use crate::error::{Error, Result};
use crate::finger::{locate, Fingers};
use crate::level::LevelGenerator;
use crate::node::Node;
use crate::sync::{Mutex, RwLock};

/// Default maximum height of the skiplist.
pub const MAX_HEIGHT: usize = 12;
/// Default probability of promoting a node one level up.
pub const P: f64 = 0.25;

/// Tuning knobs of a [`SkipList`].
///
/// With the defaults (`p = 1/4`, 12 levels) the list stays efficient up to
/// about `4^12 = 16M` elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Upper bound on node height. Must be at least 1.
    pub max_height: usize,
    /// Promotion probability. Must be positive; values above 1 are clamped.
    pub probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_height: MAX_HEIGHT,
            probability: P,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        check_max_height(self.max_height)?;
        branching_inverse(self.probability)?;
        Ok(())
    }

    /// Validates and clamps the probability into `(0, 1]`.
    fn normalized(self) -> Result<Self> {
        self.validate()?;
        Ok(Self {
            probability: self.probability.min(1.0),
            ..self
        })
    }
}

fn check_max_height(max_height: usize) -> Result<()> {
    if max_height == 0 {
        return Err(Error::InvalidArgument(
            "max height must be at least 1".into(),
        ));
    }
    Ok(())
}

/// `ceil(1 / p)` with `p` clamped to at most 1.
fn branching_inverse(probability: f64) -> Result<u32> {
    if probability.is_nan() || probability <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "probability must be positive, got {}",
            probability
        )));
    }
    Ok(inverse_of(probability))
}

fn inverse_of(probability: f64) -> u32 {
    (1.0 / probability.min(1.0)).ceil() as u32
}

/// Per-level population, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    /// Tracked element count.
    pub count: usize,
    /// Elements actually reachable on the base level.
    pub real_count: usize,
    pub height: usize,
    pub max_height: usize,
    /// `levels[l]` is the number of nodes linked at level `l`.
    pub levels: Vec<usize>,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total nodes  : {}", self.count)?;
        writeln!(f, "Real count   : {}", self.real_count)?;
        writeln!(f, "Total levels : {}", self.height)?;
        for (level, nodes) in self.levels.iter().enumerate() {
            writeln!(f, "Level {} count: {}", level, nodes)?;
        }
        Ok(())
    }
}

/// Everything guarded by the structure lock.
struct Inner<K, V, C, R> {
    arena: Arena<K, V>,
    /// Number of levels in use, `>= 1`.
    height: usize,
    count: usize,
    config: Config,
    comparator: Option<C>,
    levels: LevelGenerator<R>,
    /// Fingers left behind by the last insert. Only writers touch them.
    insert_fingers: Fingers,
}

impl<K, V, C, R> Inner<K, V, C, R>
where
    K: Clone + PartialEq,
    C: Comparator<K>,
    R: RngCore,
{
    fn comparator(&self) -> Result<&C> {
        self.comparator.as_ref().ok_or(Error::Unconfigured)
    }

    fn check_range(&self, lo: &K, hi: &K) -> Result<&C> {
        let cmp = self.comparator()?;
        cmp.validate(lo)?;
        cmp.validate(hi)?;
        cmp.same_domain(lo, hi)?;
        Ok(cmp)
    }

    /// Links a new node of `height` levels in front of the first node that is
    /// not strictly before `key`. Among equal keys the newest comes first.
    fn insert(&mut self, key: K, value: Arc<V>, height: usize) -> Result<Entry<K, V>> {
        assert!(height > 0, "invalid node height {}", height);
        let cmp = self.comparator()?;
        cmp.validate(&key)?;

        let mut fingers = self.insert_fingers.clone();
        fingers.reserve_levels(height.max(self.arena.levels()));
        locate(&self.arena, self.height, cmp, &key, &mut fingers)?;

        if height > self.height {
            for level in self.height..height {
                fingers[level] = Pos::Head;
            }
            self.arena.reserve_levels(height);
            debug!(from = self.height, to = height, "raising list height");
            self.height = height;
        }

        let id = self.arena.alloc(Node::new(key, value, height));
        for level in 0..height {
            let next = self.arena.next(fingers[level], level);
            self.arena[id].set_next_at(level, next);
            self.arena.set_next(fingers[level], level, Some(id));
        }
        self.count += 1;
        self.insert_fingers = fingers;

        trace!(%id, height, count = self.count, "linked node");
        Ok(self.arena[id].to_entry())
    }

    /// Points every node equal to `key` at `value`. Links are untouched, so
    /// both finger caches stay valid.
    fn replace_values(&mut self, key: &K, value: Arc<V>) -> Result<usize> {
        let cmp = self.comparator()?;
        cmp.validate(key)?;

        let mut fingers = self.insert_fingers.clone();
        locate(&self.arena, self.height, cmp, key, &mut fingers)?;
        let matched = self.scan(cmp, &fingers, key)?;

        for &id in &matched {
            self.arena[id].set_value(Arc::clone(&value));
        }
        self.insert_fingers = fingers;
        trace!(updated = matched.len(), "replaced values");
        Ok(matched.len())
    }

    /// Collects the run of nodes after `fingers[0]` whose keys are at or
    /// before `hi`.
    fn scan(&self, cmp: &C, fingers: &Fingers, hi: &K) -> Result<Vec<NodeId>> {
        let mut matched = Vec::new();
        let mut cursor = self.arena.next(fingers[0], 0);
        while let Some(id) = cursor {
            let node = &self.arena[id];
            if !(node.key() == hi || cmp.before(node.key(), hi)?) {
                break;
            }
            matched.push(id);
            cursor = node.next();
        }
        Ok(matched)
    }

    /// Unlinks every node in `[lo, hi]`, starting the search from `fingers`.
    ///
    /// All comparisons happen before the first link is rewritten, so an error
    /// leaves the list untouched. Returns the removed entries and the fingers
    /// for `lo`, which stay valid after the removal.
    fn delete_range(
        &mut self,
        lo: &K,
        hi: &K,
        mut fingers: Fingers,
    ) -> Result<(Vec<Entry<K, V>>, Fingers)> {
        let cmp = self.check_range(lo, hi)?;
        fingers.reserve_levels(self.arena.levels());
        locate(&self.arena, self.height, cmp, lo, &mut fingers)?;
        let doomed = self.scan(cmp, &fingers, hi)?;

        let mut removed = Vec::with_capacity(doomed.len());
        for id in doomed {
            for level in 0..self.arena[id].height() {
                if self.arena.next(fingers[level], level) == Some(id) {
                    let next = self.arena[id].next_at(level);
                    self.arena.set_next(fingers[level], level, next);
                }
            }
            if let Some(node) = self.arena.free(id) {
                removed.push(node.into_entry());
                self.count -= 1;
            }
        }

        self.shrink();
        self.insert_fingers = fingers.clone();
        trace!(removed = removed.len(), count = self.count, "unlinked range");
        Ok((removed, fingers))
    }

    /// Drops empty top levels, never going below one level.
    fn shrink(&mut self) {
        let before = self.height;
        while self.height > 1 && self.arena.next(Pos::Head, self.height - 1).is_none() {
            self.height -= 1;
        }
        if self.height != before {
            debug!(from = before, to = self.height, "lowered list height");
        }
    }

    fn level_len(&self, level: usize) -> usize {
        let mut len = 0;
        let mut cursor = self.arena.next(Pos::Head, level);
        while let Some(id) = cursor {
            len += 1;
            cursor = self.arena[id].next_at(level);
        }
        len
    }
}

/// A skiplist map that keeps duplicate keys, ordered by a [`Comparator`].
///
/// All operations go through one reader-writer lock: inserts, deletes and
/// configuration changes are exclusive, selects are shared.
///
/// Two finger caches make searches near the previous one cheap: one for
/// inserts and one for selects. A select works on a private copy of the
/// select cache and writes it back only if nobody else is using it at that
/// moment, while still holding the shared lock. Every insert and delete
/// rewrites the caches from its own finished search, so a cache never names
/// a freed node or a stale predecessor.
///
/// ```
/// use fingerskip::{Descending, SkipList};
///
/// let list = SkipList::new(Descending);
/// for (k, v) in [(1, "a"), (3, "b"), (2, "c"), (3, "d")] {
///     list.insert(k, v).unwrap();
/// }
///
/// let keys: Vec<i32> = list.snapshot().into_iter().map(|e| *e.key()).collect();
/// assert_eq!(keys, vec![3, 3, 2, 1]);
///
/// let threes = list.select(&3).unwrap();
/// // the most recent insert of a duplicate key comes first
/// assert_eq!(threes.entries()[0].value(), &"d");
///
/// assert_eq!(list.delete_range(&3, &2).unwrap().count(), 3);
/// assert_eq!(list.count(), 1);
/// ```
pub struct SkipList<K, V, C = Ascending, R = StdRng> {
    inner: RwLock<Inner<K, V, C, R>>,
    /// Fingers left behind by the last select, or by the last write.
    select_fingers: Mutex<Fingers>,
}

impl<K, V, C> SkipList<K, V, C, StdRng> {
    /// Creates a list with the default [`Config`] and an entropy-seeded
    /// random source.
    pub fn new(comparator: C) -> Self {
        Self::build(Some(comparator), Config::default(), StdRng::from_entropy())
    }

    pub fn with_config(comparator: C, config: Config) -> Result<Self> {
        Self::with_rng(Some(comparator), config, StdRng::from_entropy())
    }

    /// Creates a list that rejects every ordered operation with
    /// [`Error::Unconfigured`] until [`SkipList::set_comparator`] is called.
    pub fn without_comparator(config: Config) -> Result<Self> {
        Self::with_rng(None, config, StdRng::from_entropy())
    }
}

impl<K, V, C, R: RngCore> SkipList<K, V, C, R> {
    /// Creates a list drawing node heights from `rng`. Use a seeded source
    /// for reproducible layouts.
    pub fn with_rng(comparator: Option<C>, config: Config, rng: R) -> Result<Self> {
        Ok(Self::build(comparator, config.normalized()?, rng))
    }

    fn build(comparator: Option<C>, config: Config, rng: R) -> Self {
        let inverse = inverse_of(config.probability);
        // head links grow on demand as taller nodes arrive
        let levels = config.max_height.min(MAX_HEIGHT);
        debug!(
            max_height = config.max_height,
            probability = config.probability,
            "creating skiplist"
        );
        Self {
            inner: RwLock::new(Inner {
                arena: Arena::new(levels),
                height: 1,
                count: 0,
                config,
                comparator,
                levels: LevelGenerator::new(rng, inverse, config.max_height),
                insert_fingers: Fingers::new(levels),
            }),
            select_fingers: Mutex::new(Fingers::new(levels)),
        }
    }
}

impl<K, V, C, R> SkipList<K, V, C, R>
where
    K: Clone + PartialEq,
    C: Comparator<K>,
    R: RngCore,
{
    /// Inserts `key` with `value`. Duplicate keys are kept; a new duplicate is
    /// placed before the existing ones.
    ///
    /// Returns a copy of the created entry.
    ///
    /// # Errors
    /// - [`Error::Unconfigured`] if no comparator is set.
    /// - [`Error::InvalidArgument`] if the comparator rejects the key.
    /// - [`Error::ComparisonFailure`] if the comparator fails during the search.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&self, key: K, value: V) -> Result<Entry<K, V>> {
        let mut inner = self.inner.write();
        let height = inner.levels.next_height();
        trace!(height, "drew node height");
        let entry = inner.insert(key, Arc::new(value), height)?;
        *self.select_fingers.lock() = inner.insert_fingers.clone();
        Ok(entry)
    }

    /// Returns every entry equal to `key`, newest first.
    pub fn select(&self, key: &K) -> Result<Cursor<K, V>> {
        self.select_range(key, key)
    }

    /// Returns every entry from `lo` through `hi` inclusive, in list order.
    ///
    /// # Errors
    /// - [`Error::Unconfigured`] if no comparator is set.
    /// - [`Error::InvalidArgument`] if a bound is rejected or the bounds are
    ///   of different key domains.
    /// - [`Error::ComparisonFailure`] if the comparator fails.
    #[instrument(level = "trace", skip_all)]
    pub fn select_range(&self, lo: &K, hi: &K) -> Result<Cursor<K, V>> {
        let inner = self.inner.read();
        let cmp = inner.check_range(lo, hi)?;

        let mut fingers = match self.select_fingers.try_lock() {
            Some(cached) => cached.clone(),
            None => {
                trace!("select cache busy, searching from the top");
                Fingers::new(inner.arena.levels())
            }
        };
        fingers.reserve_levels(inner.arena.levels());
        locate(&inner.arena, inner.height, cmp, lo, &mut fingers)?;

        let entries: Vec<_> = inner
            .scan(cmp, &fingers, hi)?
            .into_iter()
            .map(|id| inner.arena[id].to_entry())
            .collect();

        // still under the shared lock, so every id in `fingers` is live
        if let Some(mut cached) = self.select_fingers.try_lock() {
            *cached = fingers;
        }

        trace!(matched = entries.len(), "selected range");
        Ok(Cursor::new(entries))
    }

    /// Replaces the value of every entry equal to `key` and returns how many
    /// were updated. Entries already handed out keep the old value.
    ///
    /// # Errors
    /// Same as [`SkipList::insert`].
    #[instrument(level = "trace", skip_all)]
    pub fn update(&self, key: &K, value: V) -> Result<usize> {
        let mut inner = self.inner.write();
        let updated = inner.replace_values(key, Arc::new(value))?;
        *self.select_fingers.lock() = inner.insert_fingers.clone();
        Ok(updated)
    }

    /// Removes every entry equal to `key` and returns them.
    pub fn delete(&self, key: &K) -> Result<Cursor<K, V>> {
        self.delete_range(key, key)
    }

    /// Removes every entry from `lo` through `hi` inclusive and returns them
    /// in list order. Empty top levels are dropped afterwards.
    ///
    /// # Errors
    /// Same as [`SkipList::select_range`]. On error nothing is removed.
    #[instrument(level = "trace", skip_all)]
    pub fn delete_range(&self, lo: &K, hi: &K) -> Result<Cursor<K, V>> {
        let mut inner = self.inner.write();
        let mut cached = self.select_fingers.lock();
        let (removed, fingers) = inner.delete_range(lo, hi, cached.clone())?;
        *cached = fingers;
        Ok(Cursor::new(removed))
    }

    /// Every live entry in list order.
    pub fn snapshot(&self) -> Cursor<K, V> {
        let inner = self.inner.read();
        let mut entries = Vec::with_capacity(inner.count);
        let mut cursor = inner.arena.next(Pos::Head, 0);
        while let Some(id) = cursor {
            let node = &inner.arena[id];
            entries.push(node.to_entry());
            cursor = node.next();
        }
        Cursor::new(entries)
    }

    /// Counts the nodes reachable on the base level. Always equal to
    /// [`SkipList::count`]; walks the whole list.
    pub fn real_count(&self) -> usize {
        self.inner.read().level_len(0)
    }

    /// Walks every level in use and reports its population.
    pub fn stats(&self) -> Stats {
        let inner = self.inner.read();
        let levels: Vec<usize> = (0..inner.height).map(|l| inner.level_len(l)).collect();
        let stats = Stats {
            count: inner.count,
            real_count: levels[0],
            height: inner.height,
            max_height: inner.config.max_height,
            levels,
        };
        debug!(
            count = stats.count,
            real_count = stats.real_count,
            height = stats.height,
            arena_len = inner.arena.len(),
            "collected stats"
        );
        stats
    }
}

impl<K, V, C, R> SkipList<K, V, C, R> {
    /// Replaces the comparator. The list is not re-sorted, so this is only
    /// meaningful on an empty list or with an equivalent ordering.
    pub fn set_comparator(&self, comparator: C) {
        let mut inner = self.inner.write();
        inner.comparator = Some(comparator);
        let levels = inner.arena.levels();
        inner.insert_fingers = Fingers::new(levels);
        *self.select_fingers.lock() = Fingers::new(levels);
        debug!("comparator replaced");
    }

    /// Changes the height cap for nodes inserted from now on. Lowering it
    /// does not touch nodes that are already taller. Nothing is allocated
    /// here; the head grows when a taller node is first inserted.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if `max_height` is zero.
    pub fn set_max_height(&self, max_height: usize) -> Result<()>
    where
        R: RngCore,
    {
        check_max_height(max_height)?;
        let mut inner = self.inner.write();
        inner.config.max_height = max_height;
        inner.levels.set_max_height(max_height);
        debug!(max_height, "max height changed");
        Ok(())
    }

    /// Changes the promotion probability. Values above 1 are clamped to 1.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if `probability` is not positive.
    pub fn set_probability(&self, probability: f64) -> Result<()>
    where
        R: RngCore,
    {
        let inverse = branching_inverse(probability)?;
        let mut inner = self.inner.write();
        inner.config.probability = probability.min(1.0);
        inner.levels.set_branching_inverse(inverse);
        debug!(probability, inverse, "probability changed");
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.inner.read().count
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of levels currently in use.
    pub fn height(&self) -> usize {
        self.inner.read().height
    }

    pub fn max_height(&self) -> usize {
        self.inner.read().config.max_height
    }

    pub fn probability(&self) -> f64 {
        self.inner.read().config.probability
    }

    pub fn config(&self) -> Config {
        self.inner.read().config
    }
}

impl<K, V, C: Default> Default for SkipList<K, V, C, StdRng> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<K, V, C, R> fmt::Debug for SkipList<K, V, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("SkipList")
            .field("count", &inner.count)
            .field("height", &inner.height)
            .field("config", &inner.config)
            .finish_non_exhaustive()
    }
}
