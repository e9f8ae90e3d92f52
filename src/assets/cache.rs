//! The asset registry and its preload/lookup/dispose lifecycle.
//!
//! The cache is single-threaded: the registry sits behind a `RefCell` so
//! scene code can query it synchronously while a preload future is still
//! pending. No borrow is ever held across an `.await`.
//!
//! Each disposal bumps a generation counter. A load that completes after
//! the cache was disposed (or disposed and reinitialized) carries a stale
//! generation and is dropped without touching the registry.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::join_all;
use rustc_hash::{FxHashMap, FxHashSet};

use super::fallback::{synthesize, FallbackPalette, FallbackStyle};
use super::image::{ImageHandle, ImageResource};
use super::progress::{PreloadProgress, PreloadReport};
use super::source::{ImageSource, LoadError};
use super::AssetError;
use crate::options::AssetOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Active,
    Disposed,
}

struct Registry {
    resolved: FxHashMap<String, ImageHandle>,
    fallbacks: FxHashMap<String, ImageHandle>,
    /// Fallbacks superseded by a successful load. Consumers may still hold
    /// them, so they live until disposal.
    retired: Vec<ImageHandle>,
    pending: FxHashSet<String>,
    lifecycle: Lifecycle,
    generation: u64,
    progress: PreloadProgress,
}

impl Registry {
    fn new() -> Self {
        Self {
            resolved: FxHashMap::default(),
            fallbacks: FxHashMap::default(),
            retired: Vec::new(),
            pending: FxHashSet::default(),
            lifecycle: Lifecycle::Active,
            generation: 0,
            progress: PreloadProgress::default(),
        }
    }

    fn ensure_active(&self) -> Result<(), AssetError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Disposed => Err(AssetError::Disposed),
        }
    }

    fn is_live(&self, generation: u64) -> bool {
        self.lifecycle == Lifecycle::Active && self.generation == generation
    }
}

/// Names one preload has issued but not yet settled.
///
/// Dropping the preload future before its loads finish drops this guard,
/// which hands the unsettled names back: they leave `pending` and the
/// progress total shrinks by their count, so a later preload fetches them
/// again.
struct InFlight<'a> {
    registry: &'a RefCell<Registry>,
    generation: u64,
    outstanding: RefCell<FxHashSet<String>>,
}

impl<'a> InFlight<'a> {
    fn new(
        registry: &'a RefCell<Registry>,
        generation: u64,
        names: &[String],
    ) -> Self {
        Self {
            registry,
            generation,
            outstanding: RefCell::new(names.iter().cloned().collect()),
        }
    }

    fn settled(&self, name: &str) {
        let _ = self.outstanding.borrow_mut().remove(name);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let outstanding = self.outstanding.get_mut();
        if outstanding.is_empty() {
            return;
        }
        let Ok(mut reg) = self.registry.try_borrow_mut() else {
            return;
        };
        if !reg.is_live(self.generation) {
            return;
        }
        let mut abandoned = 0;
        for name in outstanding.drain() {
            if reg.pending.remove(&name) {
                abandoned += 1;
            }
        }
        reg.progress.total = reg.progress.total.saturating_sub(abandoned);
        drop(reg);
        log::debug!("Preload dropped with {abandoned} loads unsettled");
    }
}

/// Owns every image resource of a gallery session.
///
/// Created by the host at startup, queried synchronously by scene code,
/// and disposed exactly once at teardown. See the module docs for the
/// concurrency model.
pub struct AssetCache {
    available: Vec<String>,
    palette: FallbackPalette,
    style: FallbackStyle,
    registry: RefCell<Registry>,
}

impl AssetCache {
    /// Build an active, empty cache for the configured registry.
    #[must_use]
    pub fn new(options: &AssetOptions) -> Self {
        Self {
            available: options.available.clone(),
            palette: FallbackPalette::new(options.palette.clone()),
            style: FallbackStyle::from_options(options),
            registry: RefCell::new(Registry::new()),
        }
    }

    /// Asset names in registry order.
    #[must_use]
    pub fn available_names(&self) -> &[String] {
        &self.available
    }

    /// Palette used for placeholders.
    #[must_use]
    pub fn palette(&self) -> &FallbackPalette {
        &self.palette
    }

    /// True between [`dispose`](Self::dispose) and
    /// [`reinitialize`](Self::reinitialize).
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.registry.borrow().lifecycle == Lifecycle::Disposed
    }

    /// Counters of the current (or last) preload.
    #[must_use]
    pub fn progress(&self) -> PreloadProgress {
        self.registry.borrow().progress
    }

    /// Number of successfully loaded images held.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.registry.borrow().resolved.len()
    }

    /// Number of live placeholders held.
    #[must_use]
    pub fn fallback_count(&self) -> usize {
        self.registry.borrow().fallbacks.len()
    }

    /// True if `name` has a successfully loaded image.
    #[must_use]
    pub fn is_resolved(&self, name: &str) -> bool {
        self.registry.borrow().resolved.contains_key(name)
    }

    /// True if a load for `name` is in flight.
    #[must_use]
    pub fn is_pending(&self, name: &str) -> bool {
        self.registry.borrow().pending.contains(name)
    }

    /// Load every name in `names` from `source`.
    ///
    /// All fetches are issued at once and joined; none waits on another.
    /// Each result lands in the registry the moment it completes, so
    /// [`get`](Self::get) sees real images before the whole preload
    /// finishes. Failures are logged and replaced with placeholders.
    ///
    /// Duplicate names are fetched once. Names that are already resolved,
    /// or already being fetched by another preload, are skipped.
    ///
    /// `on_done(all_succeeded)` runs exactly once, after every fetch is
    /// terminal. An empty request completes on the first poll with
    /// `on_done(true)`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Disposed`] if the cache is disposed.
    #[allow(clippy::future_not_send)]
    pub async fn preload<S, F>(
        &self,
        source: &S,
        names: &[String],
        on_done: F,
    ) -> Result<PreloadReport, AssetError>
    where
        S: ImageSource,
        F: FnOnce(bool),
    {
        let mut report = PreloadReport::default();
        let (generation, requested) = {
            let mut reg = self.registry.borrow_mut();
            reg.ensure_active()?;

            let mut seen = FxHashSet::default();
            let mut requested = Vec::with_capacity(names.len());
            for name in names {
                if !seen.insert(name.as_str()) {
                    continue;
                }
                if reg.resolved.contains_key(name) || reg.pending.contains(name) {
                    log::debug!("Skipping preload of {name}: already resolved or in flight");
                    report.skipped.push(name.clone());
                    continue;
                }
                let _ = reg.pending.insert(name.clone());
                requested.push(name.clone());
            }

            if reg.progress.is_complete() {
                reg.progress = PreloadProgress::begin(requested.len());
            } else {
                reg.progress.total += requested.len();
            }
            (reg.generation, requested)
        };

        log::info!("Preloading {} images...", requested.len());
        let in_flight = InFlight::new(&self.registry, generation, &requested);
        let outcomes = join_all(
            requested
                .iter()
                .map(|name| self.load_one(source, name, &in_flight)),
        )
        .await;
        drop(in_flight);

        for (name, succeeded) in requested.into_iter().zip(outcomes) {
            if succeeded {
                report.loaded.push(name);
            } else {
                report.failed.push(name);
            }
        }

        if report.all_succeeded() {
            log::info!("All {} images preloaded successfully", report.total());
        } else {
            log::warn!(
                "Image preloading completed with {} of {} failures",
                report.failed.len(),
                report.total()
            );
        }
        on_done(report.all_succeeded());
        Ok(report)
    }

    #[allow(clippy::future_not_send)]
    async fn load_one<S: ImageSource>(
        &self,
        source: &S,
        name: &str,
        in_flight: &InFlight<'_>,
    ) -> bool {
        let outcome = source.load(name).await;
        in_flight.settled(name);
        self.settle(name, in_flight.generation, outcome)
    }

    fn settle(
        &self,
        name: &str,
        generation: u64,
        outcome: Result<ImageResource, LoadError>,
    ) -> bool {
        let succeeded = outcome.is_ok();
        let mut guard = self.registry.borrow_mut();
        let reg = &mut *guard;
        if !reg.is_live(generation) {
            log::debug!("Discarding late load of {name}: cache was disposed");
            return succeeded;
        }

        let _ = reg.pending.remove(name);
        reg.progress.record(succeeded);
        match outcome {
            Ok(image) => {
                if let Some(superseded) = reg.fallbacks.remove(name) {
                    reg.retired.push(superseded);
                }
                if let Some(previous) = reg.resolved.insert(name.to_owned(), Rc::new(image)) {
                    reg.retired.push(previous);
                }
            }
            Err(err) => {
                log::warn!("Failed to preload image {name}: {err}");
                if !reg.resolved.contains_key(name) {
                    let _ = reg
                        .fallbacks
                        .entry(name.to_owned())
                        .or_insert_with(|| self.synthesize_named(name));
                }
            }
        }
        succeeded
    }

    fn synthesize_named(&self, name: &str) -> ImageHandle {
        Rc::new(synthesize(name, self.palette.color_for_name(name), self.style))
    }

    fn lookup(&self, reg: &mut Registry, name: &str) -> ImageHandle {
        if let Some(handle) = reg.resolved.get(name) {
            return Rc::clone(handle);
        }
        Rc::clone(
            reg.fallbacks
                .entry(name.to_owned())
                .or_insert_with(|| self.synthesize_named(name)),
        )
    }

    /// Resource for `name`: the loaded image if there is one, else its
    /// placeholder (synthesized and memoized on first request).
    ///
    /// Never starts a load. Repeated calls return the same handle until a
    /// load for `name` succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Disposed`] if the cache is disposed.
    pub fn get(&self, name: &str) -> Result<ImageHandle, AssetError> {
        let mut guard = self.registry.borrow_mut();
        guard.ensure_active()?;
        Ok(self.lookup(&mut guard, name))
    }

    /// Exactly `count` resources: the registry's names in order, then
    /// per-slot placeholders keyed by [`placeholder_name`].
    ///
    /// Two calls with the same `count` and no intervening load or disposal
    /// return identical handles slot by slot.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Disposed`] if the cache is disposed.
    pub fn get_set(&self, count: usize) -> Result<Vec<ImageHandle>, AssetError> {
        let mut guard = self.registry.borrow_mut();
        let reg = &mut *guard;
        reg.ensure_active()?;

        let named = count.min(self.available.len());
        let mut set = Vec::with_capacity(count);
        for name in &self.available[..named] {
            set.push(self.lookup(reg, name));
        }
        for slot in named..count {
            let handle = reg
                .fallbacks
                .entry(placeholder_name(slot))
                .or_insert_with_key(|key| {
                    Rc::new(synthesize(key, self.palette.color_at(slot), self.style))
                });
            set.push(Rc::clone(handle));
        }
        Ok(set)
    }

    /// Resources for a list of image paths; directory prefixes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Disposed`] if the cache is disposed.
    pub fn get_gallery_images<P: AsRef<str>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<ImageHandle>, AssetError> {
        paths
            .iter()
            .map(|path| self.get(strip_directory(path.as_ref())))
            .collect()
    }

    /// Upload every held resource to the GPU. Returns how many are now
    /// resident.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Disposed`] if the cache is disposed and
    /// [`AssetError::Released`] if a held resource was already released.
    pub fn upload_all(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<usize, AssetError> {
        let reg = self.registry.borrow();
        reg.ensure_active()?;
        let mut count = 0;
        for handle in reg.resolved.values().chain(reg.fallbacks.values()) {
            handle.upload(device, queue)?;
            count += 1;
        }
        Ok(count)
    }

    /// Release every resource (loaded, placeholder and superseded) and
    /// clear the registry.
    ///
    /// Returns the number of resources released. Calling it again is a
    /// no-op returning 0. Loads still in flight are discarded when they
    /// complete.
    pub fn dispose(&self) -> usize {
        let mut guard = self.registry.borrow_mut();
        let reg = &mut *guard;

        let mut released = 0;
        let handles = reg
            .resolved
            .drain()
            .map(|(_, handle)| handle)
            .chain(reg.fallbacks.drain().map(|(_, handle)| handle))
            .chain(reg.retired.drain(..));
        for handle in handles {
            if handle.release() {
                released += 1;
            }
        }

        if reg.lifecycle == Lifecycle::Active {
            reg.lifecycle = Lifecycle::Disposed;
            reg.generation += 1;
            reg.pending.clear();
            reg.progress = PreloadProgress::default();
            log::info!("Disposed {released} image resources");
        } else {
            log::debug!("Asset cache already disposed");
        }
        released
    }

    /// Reopen a disposed cache, empty, for a new session.
    ///
    /// Returns `false` if the cache was not disposed.
    pub fn reinitialize(&self) -> bool {
        let mut reg = self.registry.borrow_mut();
        if reg.lifecycle == Lifecycle::Active {
            return false;
        }
        reg.lifecycle = Lifecycle::Active;
        log::debug!("Asset cache reinitialized (generation {})", reg.generation);
        true
    }
}

impl Drop for AssetCache {
    fn drop(&mut self) {
        let _ = self.dispose();
    }
}

/// Registry key of the placeholder filling padded slot `slot` (0-based).
#[must_use]
pub fn placeholder_name(slot: usize) -> String {
    format!("placeholder-{}", slot + 1)
}

/// Final path component of `path` (`a/b/c.jpg` → `c.jpg`).
#[must_use]
pub fn strip_directory(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, file)| file)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use futures::channel::oneshot;

    use super::*;
    use crate::assets::image::{same_resource, ImageOrigin};
    use crate::assets::source::{encode_solid_png, DirectorySource, MemorySource};

    fn options(names: &[&str]) -> AssetOptions {
        AssetOptions {
            available: names.iter().map(|n| (*n).to_owned()).collect(),
            fallback_size: 64,
            ..AssetOptions::default()
        }
    }

    fn png() -> Vec<u8> {
        encode_solid_png(4, 4, [200, 100, 50, 255]).unwrap()
    }

    fn source_with(names: &[&str]) -> MemorySource {
        names
            .iter()
            .fold(MemorySource::new(), |source, name| source.with(name, png()))
    }

    fn poll_once<F: Future>(fut: Pin<&mut F>) -> Poll<F::Output> {
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        fut.poll(&mut cx)
    }

    /// Completes each fetch only when the test sends its bytes.
    struct GatedSource {
        gates: RefCell<FxHashMap<String, oneshot::Receiver<Vec<u8>>>>,
    }

    impl GatedSource {
        fn new(names: &[&str]) -> (Self, FxHashMap<String, oneshot::Sender<Vec<u8>>>) {
            let mut gates = FxHashMap::default();
            let mut senders = FxHashMap::default();
            for name in names {
                let (tx, rx) = oneshot::channel();
                let _ = gates.insert((*name).to_owned(), rx);
                let _ = senders.insert((*name).to_owned(), tx);
            }
            (
                Self {
                    gates: RefCell::new(gates),
                },
                senders,
            )
        }
    }

    impl ImageSource for GatedSource {
        async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
            let gate = self.gates.borrow_mut().remove(name);
            let not_found = || LoadError::NotFound {
                name: name.to_owned(),
            };
            match gate {
                Some(rx) => rx.await.map_err(|_| not_found()),
                None => Err(not_found()),
            }
        }
    }

    /// Counts fetches per name; every fetch fails.
    #[derive(Default)]
    struct CountingSource {
        calls: RefCell<Vec<String>>,
    }

    impl ImageSource for CountingSource {
        async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
            self.calls.borrow_mut().push(name.to_owned());
            Err(LoadError::NotFound {
                name: name.to_owned(),
            })
        }
    }

    #[test]
    fn preload_success_resolves_every_name() {
        let names = ["a.png", "bb.png", "ccc.png"];
        let cache = AssetCache::new(&options(&names));
        let calls = Cell::new(0);
        let flag = Cell::new(None);

        let report = pollster::block_on(cache.preload(
            &source_with(&names),
            cache.available_names(),
            |ok| {
                calls.set(calls.get() + 1);
                flag.set(Some(ok));
            },
        ))
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(flag.get(), Some(true));
        assert!(report.all_succeeded());
        assert_eq!(report.loaded.len(), 3);
        assert_eq!(cache.resolved_count(), 3);
        assert_eq!(cache.fallback_count(), 0);
        for name in names {
            let first = cache.get(name).unwrap();
            assert_eq!(first.origin(), ImageOrigin::Loaded);
            assert!(same_resource(&first, &cache.get(name).unwrap()));
        }
        assert!(cache.progress().is_complete());
    }

    #[test]
    fn empty_preload_completes_on_first_poll() {
        let cache = AssetCache::new(&options(&[]));
        let source = MemorySource::new();
        let names: Vec<String> = Vec::new();
        let flag = Cell::new(None);
        let mut fut = Box::pin(cache.preload(&source, &names, |ok| flag.set(Some(ok))));
        match poll_once(fut.as_mut()) {
            Poll::Ready(report) => assert!(report.unwrap().all_succeeded()),
            Poll::Pending => unreachable!("empty preload should be immediate"),
        }
        assert_eq!(flag.get(), Some(true));
    }

    #[test]
    fn total_failure_still_completes_once_with_fallbacks() {
        let names = ["a.png", "bb.png", "ccc.png", "dddd.png"];
        let cache = AssetCache::new(&options(&names));
        let calls = Cell::new(0);
        let flag = Cell::new(None);

        let report = pollster::block_on(cache.preload(
            &MemorySource::new(),
            cache.available_names(),
            |ok| {
                calls.set(calls.get() + 1);
                flag.set(Some(ok));
            },
        ))
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(flag.get(), Some(false));
        assert_eq!(report.failed.len(), 4);
        assert_eq!(cache.fallback_count(), 4);
        assert!(cache.progress().has_errors());
        for name in names {
            let handle = cache.get(name).unwrap();
            assert!(handle.is_fallback());
            assert_eq!(handle.label(), name);
            assert!(same_resource(&handle, &cache.get(name).unwrap()));
        }
    }

    #[test]
    fn partial_failure_puts_each_name_in_exactly_one_map() {
        let names = ["a.png", "bb.png", "ccc.png"];
        let cache = AssetCache::new(&options(&names));
        let source = source_with(&["a.png", "ccc.png"]);

        let report =
            pollster::block_on(cache.preload(&source, cache.available_names(), |_| {})).unwrap();

        assert_eq!(report.failed, vec!["bb.png".to_owned()]);
        assert_eq!(cache.resolved_count() + cache.fallback_count(), names.len());
        assert!(cache.is_resolved("a.png"));
        assert!(!cache.is_resolved("bb.png"));
        assert!(cache.get("bb.png").unwrap().is_fallback());
    }

    #[test]
    fn undecodable_bytes_fall_back() {
        let cache = AssetCache::new(&options(&["x.jpg"]));
        let source = MemorySource::new().with("x.jpg", b"not a jpeg".to_vec());
        let report =
            pollster::block_on(cache.preload(&source, cache.available_names(), |_| {})).unwrap();
        assert!(!report.all_succeeded());
        assert!(cache.get("x.jpg").unwrap().is_fallback());
    }

    #[test]
    fn get_without_preload_memoizes_placeholder() {
        let cache = AssetCache::new(&options(&["lido.jpg"]));
        let a = cache.get("lido.jpg").unwrap();
        let b = cache.get("lido.jpg").unwrap();
        assert!(same_resource(&a, &b));
        assert!(a.is_fallback());
        // Colour comes from the name length: 8 % 4 = 0.
        assert_eq!(a.pixel(32, 2), Some([0x44, 0x44, 0xaa, 0xff]));
        assert_eq!(cache.resolved_count(), 0);
    }

    #[test]
    fn successful_load_supersedes_earlier_placeholder() {
        let cache = AssetCache::new(&options(&["a.png"]));
        let placeholder = cache.get("a.png").unwrap();

        let _ = pollster::block_on(cache.preload(
            &source_with(&["a.png"]),
            cache.available_names(),
            |_| {},
        ))
        .unwrap();

        let loaded = cache.get("a.png").unwrap();
        assert!(!loaded.is_fallback());
        assert!(!same_resource(&placeholder, &loaded));
        assert_eq!(cache.fallback_count(), 0);
        // The superseded placeholder stays valid until disposal.
        assert!(!placeholder.is_released());
        assert_eq!(cache.dispose(), 2);
        assert!(placeholder.is_released());
        assert!(loaded.is_released());
    }

    #[test]
    fn get_set_within_registry_follows_order() {
        let names = ["a.png", "bb.png", "ccc.png"];
        let cache = AssetCache::new(&options(&names));
        let first = cache.get_set(2).unwrap();
        let second = cache.get_set(2).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].label(), "a.png");
        assert_eq!(first[1].label(), "bb.png");
        for (a, b) in first.iter().zip(&second) {
            assert!(same_resource(a, b));
        }
    }

    #[test]
    fn get_set_pads_with_stable_placeholders() {
        let names = ["a.png", "bb.png"];
        let cache = AssetCache::new(&options(&names));
        let first = cache.get_set(5).unwrap();
        let second = cache.get_set(5).unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(first[2].label(), "placeholder-3");
        assert_eq!(first[4].label(), "placeholder-5");
        for (a, b) in first.iter().zip(&second) {
            assert!(same_resource(a, b));
        }
        // Padded slots are distinct from one another.
        assert!(!same_resource(&first[2], &first[3]));
        // Slot colour follows the slot index: slot 2 -> palette[2].
        assert_eq!(first[2].pixel(32, 2), Some([0x44, 0xaa, 0x44, 0xff]));
    }

    #[test]
    fn get_set_zero_is_empty() {
        let cache = AssetCache::new(&options(&["a.png"]));
        assert!(cache.get_set(0).unwrap().is_empty());
    }

    #[test]
    fn gallery_images_ignore_directories() {
        let cache = AssetCache::new(&options(&["wall.jpg"]));
        let direct = cache.get("wall.jpg").unwrap();
        let images = cache
            .get_gallery_images(&["./assets/imgs/wall.jpg", "wall.jpg"])
            .unwrap();
        assert!(same_resource(&images[0], &direct));
        assert!(same_resource(&images[1], &direct));
        assert_eq!(strip_directory("a/b/c.jpg"), "c.jpg");
        assert_eq!(strip_directory("c.jpg"), "c.jpg");
    }

    #[test]
    fn duplicate_and_resolved_names_are_fetched_once() {
        let cache = AssetCache::new(&options(&["a.png"]));
        let source = CountingSource::default();
        let names = vec!["a.png".to_owned(), "a.png".to_owned(), "b.png".to_owned()];
        let report = pollster::block_on(cache.preload(&source, &names, |_| {})).unwrap();
        assert_eq!(*source.calls.borrow(), vec!["a.png".to_owned(), "b.png".to_owned()]);
        assert_eq!(report.total(), 2);

        let ok = source_with(&["c.png"]);
        let _ = pollster::block_on(cache.preload(&ok, &["c.png".to_owned()], |_| {})).unwrap();
        let again = pollster::block_on(cache.preload(&ok, &["c.png".to_owned()], |_| {})).unwrap();
        assert_eq!(again.skipped, vec!["c.png".to_owned()]);
        assert_eq!(again.total(), 0);
    }

    #[test]
    fn out_of_order_completions_are_visible_immediately() {
        let names = ["first.png", "second.png"];
        let cache = AssetCache::new(&options(&names));
        let (source, mut senders) = GatedSource::new(&names);
        let flag = Cell::new(None);

        let mut fut = Box::pin(cache.preload(&source, cache.available_names(), |ok| {
            flag.set(Some(ok));
        }));
        assert!(poll_once(fut.as_mut()).is_pending());
        assert!(cache.is_pending("first.png"));

        senders.remove("second.png").unwrap().send(png()).unwrap();
        assert!(poll_once(fut.as_mut()).is_pending());
        assert!(cache.is_resolved("second.png"));
        assert!(cache.is_pending("first.png"));
        assert!(cache.get("first.png").unwrap().is_fallback());
        assert_eq!(cache.progress().completed, 1);
        assert_eq!(flag.get(), None);

        senders.remove("first.png").unwrap().send(png()).unwrap();
        match poll_once(fut.as_mut()) {
            Poll::Ready(report) => assert!(report.unwrap().all_succeeded()),
            Poll::Pending => unreachable!("all gates released"),
        }
        assert_eq!(flag.get(), Some(true));
        assert!(!cache.get("first.png").unwrap().is_fallback());
    }

    #[test]
    fn completions_after_dispose_are_discarded() {
        let names = ["late.png"];
        let cache = AssetCache::new(&options(&names));
        let (source, mut senders) = GatedSource::new(&names);
        let calls = Cell::new(0);

        let mut fut = Box::pin(cache.preload(&source, cache.available_names(), |_| {
            calls.set(calls.get() + 1);
        }));
        assert!(poll_once(fut.as_mut()).is_pending());

        let _ = cache.dispose();
        assert!(cache.reinitialize());

        senders.remove("late.png").unwrap().send(png()).unwrap();
        assert!(poll_once(fut.as_mut()).is_ready());
        assert_eq!(calls.get(), 1);

        assert!(!cache.is_resolved("late.png"));
        assert_eq!(cache.resolved_count(), 0);
        assert_eq!(cache.fallback_count(), 0);
    }

    #[test]
    fn pending_names_are_not_refetched_by_a_second_preload() {
        let names = ["slow.png"];
        let cache = AssetCache::new(&options(&names));
        let (source, mut senders) = GatedSource::new(&names);

        let mut first = Box::pin(cache.preload(&source, cache.available_names(), |_| {}));
        assert!(poll_once(first.as_mut()).is_pending());

        let second =
            pollster::block_on(cache.preload(&source, cache.available_names(), |_| {})).unwrap();
        assert_eq!(second.skipped, vec!["slow.png".to_owned()]);

        senders.remove("slow.png").unwrap().send(png()).unwrap();
        assert!(poll_once(first.as_mut()).is_ready());
        assert!(cache.is_resolved("slow.png"));
    }

    #[test]
    fn dropped_preload_hands_its_names_back() {
        let names = ["a.png"];
        let cache = AssetCache::new(&options(&names));
        let (gated, _senders) = GatedSource::new(&names);

        let mut abandoned =
            Box::pin(cache.preload(&gated, cache.available_names(), |_| {}));
        assert!(poll_once(abandoned.as_mut()).is_pending());
        assert!(cache.is_pending("a.png"));
        assert_eq!(cache.progress().total, 1);
        drop(abandoned);

        assert!(!cache.is_pending("a.png"));
        assert_eq!(cache.progress().total, 0);
        assert!(cache.progress().is_complete());

        let flag = Cell::new(None);
        let report = pollster::block_on(cache.preload(
            &source_with(&names),
            cache.available_names(),
            |ok| flag.set(Some(ok)),
        ))
        .unwrap();
        assert_eq!(report.loaded, vec!["a.png".to_owned()]);
        assert!(report.skipped.is_empty());
        assert_eq!(flag.get(), Some(true));
        assert!(cache.is_resolved("a.png"));
        assert_eq!(cache.progress().total, 1);
        assert_eq!(cache.progress().completed, 1);
    }

    #[test]
    fn dropped_preload_keeps_what_already_settled() {
        let names = ["done.png", "stuck.png"];
        let cache = AssetCache::new(&options(&names));
        let (gated, mut senders) = GatedSource::new(&names);

        let mut fut = Box::pin(cache.preload(&gated, cache.available_names(), |_| {}));
        assert!(poll_once(fut.as_mut()).is_pending());
        senders.remove("done.png").unwrap().send(png()).unwrap();
        assert!(poll_once(fut.as_mut()).is_pending());
        drop(fut);

        assert!(cache.is_resolved("done.png"));
        assert!(!cache.is_pending("stuck.png"));
        assert!(!cache.is_resolved("stuck.png"));
        assert_eq!(cache.progress().total, 1);
        assert_eq!(cache.progress().completed, 1);
        assert!(cache.progress().is_complete());
    }

    #[test]
    fn directory_loads_leave_the_polling_thread_free() {
        let dir = std::env::temp_dir()
            .join(format!("galleria-cache-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let names = ["one.png", "two.png", "three.png"];
        for name in names {
            let bytes = encode_solid_png(1024, 1024, [9, 9, 9, 255]).unwrap();
            std::fs::write(dir.join(name), bytes).unwrap();
        }

        let cache = AssetCache::new(&options(&names));
        let source = DirectorySource::new(&dir);
        let mut fut = Box::pin(cache.preload(&source, cache.available_names(), |_| {}));
        assert!(poll_once(fut.as_mut()).is_pending());
        assert!(names.iter().all(|name| cache.is_pending(name)));

        let report = pollster::block_on(fut.as_mut()).unwrap();
        assert!(report.all_succeeded());
        assert_eq!(cache.resolved_count(), 3);
        assert_eq!(cache.get("two.png").unwrap().width(), 1024);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dispose_is_idempotent() {
        let cache = AssetCache::new(&options(&["a.png", "bb.png"]));
        let set = cache.get_set(3).unwrap();
        assert_eq!(cache.dispose(), 3);
        assert!(set.iter().all(|h| h.is_released()));
        assert_eq!(cache.dispose(), 0);
        assert!(cache.is_disposed());
        assert_eq!(cache.resolved_count() + cache.fallback_count(), 0);
    }

    #[test]
    fn disposed_cache_rejects_use_until_reinitialized() {
        let cache = AssetCache::new(&options(&["a.png"]));
        let _ = cache.dispose();
        assert_eq!(cache.get("a.png").unwrap_err(), AssetError::Disposed);
        assert_eq!(cache.get_set(1).unwrap_err(), AssetError::Disposed);

        let called = Cell::new(false);
        let result = pollster::block_on(cache.preload(
            &MemorySource::new(),
            cache.available_names(),
            |_| called.set(true),
        ));
        assert_eq!(result.unwrap_err(), AssetError::Disposed);
        assert!(!called.get());

        assert!(cache.reinitialize());
        assert!(!cache.reinitialize());
        assert!(cache.get("a.png").unwrap().is_fallback());
    }
}
