//! An in-process page provider over synthetic documents.
//!
//! Each URL is routed to a [`SyntheticDocument`]. Navigation loads it, probes
//! run directly against it. Failures can be injected per URL (navigation), per
//! probe name (evaluation), or for the whole provider (launch, acquire), and
//! every lifecycle call is counted in a [`ProviderLog`] so tests can assert
//! that pages were released.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use swatch_dispatch::{PageProvider, Probe, ProviderError, RenderedPage};

use crate::document::SyntheticDocument;

/// Counters and traces of provider activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderLog {
    /// Times the provider actually started (repeated `init` calls do not count).
    pub inits: usize,
    pub shutdowns: usize,
    pub acquired: usize,
    pub released: usize,
    /// URLs in navigation order.
    pub navigations: Vec<String>,
    /// Probe names in evaluation order.
    pub evaluations: Vec<String>,
}

impl ProviderLog {
    /// Pages acquired and not yet released.
    pub fn open_pages(&self) -> usize {
        self.acquired.saturating_sub(self.released)
    }
}

#[derive(Debug, Default)]
struct Faults {
    launch: Option<String>,
    acquire: Option<String>,
    navigation: HashMap<String, String>,
    probes: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Shared {
    routes: HashMap<String, Rc<SyntheticDocument>>,
    faults: Faults,
    log: ProviderLog,
}

/// A [`PageProvider`] serving [`SyntheticDocument`]s.
///
/// ```rust
/// use swatch_dispatch::{PageGuard, PageProvider, RenderedPage};
/// use swatch_test::{SyntheticDocument, SyntheticProvider};
///
/// let mut provider = SyntheticProvider::new().route("https://example.test/", SyntheticDocument::new());
/// provider.init()?;
/// {
///     let mut page = PageGuard::acquire(&mut provider)?;
///     page.navigate("https://example.test/")?;
/// }
/// assert_eq!(provider.log().open_pages(), 0);
/// # Ok::<(), swatch_dispatch::ProviderError>(())
/// ```
#[derive(Debug, Default)]
pub struct SyntheticProvider {
    shared: Rc<RefCell<Shared>>,
    started: bool,
    next_page: usize,
    open: HashSet<usize>,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `document` at `url`.
    pub fn route(self, url: &str, document: SyntheticDocument) -> Self {
        self.shared
            .borrow_mut()
            .routes
            .insert(url.to_string(), Rc::new(document));
        self
    }

    /// Makes `init` fail.
    pub fn fail_launch(self, message: &str) -> Self {
        self.shared.borrow_mut().faults.launch = Some(message.to_string());
        self
    }

    /// Makes `acquire` fail.
    pub fn fail_acquire(self, message: &str) -> Self {
        self.shared.borrow_mut().faults.acquire = Some(message.to_string());
        self
    }

    /// Makes navigation to `url` fail.
    pub fn fail_navigation(self, url: &str, message: &str) -> Self {
        self.shared
            .borrow_mut()
            .faults
            .navigation
            .insert(url.to_string(), message.to_string());
        self
    }

    /// Makes every evaluation of the probe named `probe` fail.
    pub fn fail_probe(self, probe: &str, message: &str) -> Self {
        self.shared
            .borrow_mut()
            .faults
            .probes
            .insert(probe.to_string(), message.to_string());
        self
    }

    /// A snapshot of the activity so far.
    pub fn log(&self) -> ProviderLog {
        self.shared.borrow().log.clone()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl PageProvider for SyntheticProvider {
    type Page = SyntheticPage;

    fn init(&mut self) -> Result<(), ProviderError> {
        if self.started {
            return Ok(());
        }
        let mut shared = self.shared.borrow_mut();
        if let Some(message) = &shared.faults.launch {
            return Err(ProviderError::Launch(message.clone()));
        }
        shared.log.inits += 1;
        self.started = true;
        Ok(())
    }

    fn acquire(&mut self) -> Result<SyntheticPage, ProviderError> {
        if !self.started {
            return Err(ProviderError::Acquire("provider is not started".into()));
        }
        let mut shared = self.shared.borrow_mut();
        if let Some(message) = &shared.faults.acquire {
            return Err(ProviderError::Acquire(message.clone()));
        }
        shared.log.acquired += 1;

        let id = self.next_page;
        self.next_page += 1;
        self.open.insert(id);
        Ok(SyntheticPage {
            id,
            shared: self.shared.clone(),
            document: None,
            closed: false,
        })
    }

    fn release(&mut self, page: &mut SyntheticPage) {
        if self.open.remove(&page.id) {
            self.shared.borrow_mut().log.released += 1;
        }
        page.closed = true;
        page.document = None;
    }

    fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        self.shared.borrow_mut().log.shutdowns += 1;
    }
}

/// A page of a [`SyntheticProvider`].
#[derive(Debug)]
pub struct SyntheticPage {
    id: usize,
    shared: Rc<RefCell<Shared>>,
    document: Option<Rc<SyntheticDocument>>,
    closed: bool,
}

impl SyntheticPage {
    /// The document currently loaded, if any.
    pub fn document(&self) -> Option<&SyntheticDocument> {
        self.document.as_deref()
    }
}

impl RenderedPage for SyntheticPage {
    fn navigate(&mut self, url: &str) -> Result<(), ProviderError> {
        if self.closed {
            return Err(ProviderError::Closed);
        }
        let mut shared = self.shared.borrow_mut();
        shared.log.navigations.push(url.to_string());

        let navigation_error = |message: &str| ProviderError::Navigation {
            url: url.to_string(),
            message: message.to_string(),
        };
        if let Some(message) = shared.faults.navigation.get(url) {
            return Err(navigation_error(message));
        }
        let document = shared
            .routes
            .get(url)
            .cloned()
            .ok_or_else(|| navigation_error("404 Not Found"))?;

        tracing::debug!(url, "synthetic navigation");
        self.document = Some(document);
        Ok(())
    }

    fn evaluate(&mut self, probe: &dyn Probe) -> Result<serde_json::Value, ProviderError> {
        if self.closed {
            return Err(ProviderError::Closed);
        }
        let name = probe.name().to_string();
        let evaluation_error = |message: String| ProviderError::Evaluation {
            probe: name.clone(),
            message,
        };

        {
            let mut shared = self.shared.borrow_mut();
            shared.log.evaluations.push(name.clone());
            if let Some(message) = shared.faults.probes.get(&name) {
                return Err(evaluation_error(message.clone()));
            }
        }

        let document = self
            .document
            .as_deref()
            .ok_or_else(|| evaluation_error("no document loaded".into()))?;
        probe
            .run(document)
            .map_err(|e| evaluation_error(e.to_string()))
    }

    /// Synthetic pages have no pixels; returns an empty buffer.
    fn capture_pixels(&mut self, _full_page: bool) -> Result<Vec<u8>, ProviderError> {
        if self.closed {
            return Err(ProviderError::Closed);
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swatch_dispatch::{collect, PageGuard, Session, StyledDocument, TypedProbe};

    const URL: &str = "https://example.test/";

    struct CountElements;

    impl TypedProbe for CountElements {
        type Output = usize;
        const NAME: &'static str = "count-elements";

        fn collect(&self, document: &dyn StyledDocument) -> usize {
            document.elements().len()
        }
    }

    fn provider() -> SyntheticProvider {
        SyntheticProvider::new().route(URL, SyntheticDocument::new())
    }

    #[test]
    fn test_probe_runs_against_routed_document() {
        let mut provider = provider();
        let mut session = Session::start(&mut provider).unwrap();
        let mut page = session.page().unwrap();
        page.navigate(URL).unwrap();
        let count = collect(&mut *page, &CountElements).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_session_releases_and_shuts_down() {
        let mut provider = provider();
        {
            let mut session = Session::start(&mut provider).unwrap();
            let _page = session.page().unwrap();
        }
        let log = provider.log();
        assert_eq!((log.inits, log.acquired, log.released, log.shutdowns), (1, 1, 1, 1));
        assert!(!provider.is_started());
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut provider = provider();
        provider.init().unwrap();
        provider.init().unwrap();
        assert_eq!(provider.log().inits, 1);
    }

    #[test]
    fn test_acquire_requires_init() {
        let mut provider = provider();
        assert!(matches!(provider.acquire(), Err(ProviderError::Acquire(_))));
    }

    #[test]
    fn test_unknown_route_fails_navigation() {
        let mut provider = provider();
        provider.init().unwrap();
        let mut page = PageGuard::acquire(&mut provider).unwrap();
        let err = page.navigate("https://elsewhere.test/").unwrap_err();
        assert!(matches!(err, ProviderError::Navigation { .. }));
    }

    #[test]
    fn test_injected_faults() {
        let mut provider = provider().fail_launch("no browser");
        assert!(matches!(provider.init(), Err(ProviderError::Launch(_))));

        let mut provider = provider_with_probe_fault();
        provider.init().unwrap();
        {
            let mut page = PageGuard::acquire(&mut provider).unwrap();
            page.navigate(URL).unwrap();
            let err = collect(&mut *page, &CountElements).unwrap_err();
            assert!(err.to_string().contains("count-elements"));
        }
        let log = provider.log();
        assert_eq!(log.evaluations, vec!["count-elements".to_string()]);
        assert_eq!(log.open_pages(), 0);
    }

    fn provider_with_probe_fault() -> SyntheticProvider {
        provider().fail_probe("count-elements", "script error")
    }

    #[test]
    fn test_released_page_is_closed() {
        let mut provider = provider();
        provider.init().unwrap();
        let mut page = provider.acquire().unwrap();
        provider.release(&mut page);
        provider.release(&mut page);
        assert!(matches!(page.navigate(URL), Err(ProviderError::Closed)));
        assert_eq!(provider.log().released, 1);
    }
}
