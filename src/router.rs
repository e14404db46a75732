use crate::{Params, Path, Route};
use http::Method;
use std::collections::BTreeMap;

/// What a router decided to do with one request.
#[derive(Debug)]
pub enum Dispatch<'router, T> {
    /// The raw path was not in canonical form; the client should retry at
    /// `location`. `permanent` selects 308 over 307 and is set for GET and
    /// HEAD requests.
    Redirect { location: Path, permanent: bool },
    /// A route matched and the method has a handler bound.
    Handle { handler: &'router T, params: Params },
    /// No route pattern matched the path. Carries the nearest configured
    /// not-found handler, if any.
    NotFound { handler: Option<&'router T> },
    /// A route matched the path but nothing is bound to the method.
    /// Carries the nearest configured method-not-allowed handler, if any.
    MethodNotAllowed { handler: Option<&'router T> },
}

/// Fallback handler slots for the two ways routing comes up empty.
struct ErrorHandlers<T> {
    not_found: Option<T>,
    method_not_allowed: Option<T>,
}

impl<T> Default for ErrorHandlers<T> {
    fn default() -> Self {
        Self {
            not_found: None,
            method_not_allowed: None,
        }
    }
}

impl<T> ErrorHandlers<T> {
    fn as_ref(&self) -> ErrorHandlers<&T> {
        ErrorHandlers {
            not_found: self.not_found.as_ref(),
            method_not_allowed: self.method_not_allowed.as_ref(),
        }
    }
}

impl<'router, T> ErrorHandlers<&'router T> {
    /// Own slots win; empty ones fall back to `inherited`.
    fn or(self, inherited: ErrorHandlers<&'router T>) -> Self {
        Self {
            not_found: self.not_found.or(inherited.not_found),
            method_not_allowed: self.method_not_allowed.or(inherited.method_not_allowed),
        }
    }
}

enum Entry<T> {
    Route(Route<T>),
    Router(Router<T>),
}

/// A mounting point for routes, addressed by a shared path prefix.
///
/// Routers nest: a subrouter owns everything under its prefix, and a
/// request is delegated to the subrouter with the longest matching prefix
/// before direct routes are scanned. Paths are normalized on entry, and a
/// request for a non-canonical spelling of a path is answered with a
/// redirect to the canonical one.
///
/// Registration is addressed by absolute path throughout: registering
/// `/positions/:id` on the root lands inside a `/positions` subrouter if
/// one exists.
pub struct Router<T> {
    prefix: Path,
    entries: BTreeMap<Path, Entry<T>>,
    subrouters: Vec<Path>,
    error_handlers: ErrorHandlers<T>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::with_prefix(Path::root())
    }
}

impl<T> Router<T> {
    /// Builds a router mounted at `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self::with_prefix(Path::new(prefix))
    }

    fn with_prefix(prefix: Path) -> Self {
        Self {
            prefix,
            entries: BTreeMap::new(),
            subrouters: vec![],
            error_handlers: ErrorHandlers::default(),
        }
    }

    /// The absolute prefix this router is mounted at.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Handler for requests no route pattern matches. Without one, the
    /// nearest ancestor's handler applies, and a plain 404 response closes
    /// the gap.
    pub fn set_not_found(&mut self, handler: T) {
        self.error_handlers.not_found = Some(handler);
    }

    /// Handler for requests that match a route but not a method. Same
    /// inheritance as [`set_not_found`][Self::set_not_found].
    pub fn set_method_not_allowed(&mut self, handler: T) {
        self.error_handlers.method_not_allowed = Some(handler);
    }

    /// Creates a subrouter under this router and returns it for
    /// configuration. The given prefix is joined onto this router's own.
    ///
    /// # Panics
    ///
    /// Panics if the joined prefix is already taken by a subrouter, or if
    /// it ties an existing sibling prefix in byte length while overlapping
    /// it structurally, which would make delegation order-dependent.
    pub fn subrouter(&mut self, prefix: &str) -> &mut Router<T> {
        let prefix = self.prefix.join([prefix]);
        if self.entries.contains_key(&prefix) {
            panic!("duplicate subrouter for prefix '{}'", prefix);
        }
        for sibling in &self.subrouters {
            // equal byte length ties the longest-prefix selection
            if sibling.as_str().len() == prefix.as_str().len()
                && (prefix.has_prefix(sibling) || sibling.has_prefix(&prefix))
            {
                panic!("ambiguous subrouter prefix '{}' overlaps '{}'", prefix, sibling);
            }
        }

        log::debug!("mounting subrouter at '{}'", prefix);
        self.subrouters.push(prefix.clone());
        let entry = self
            .entries
            .entry(prefix.clone())
            .or_insert_with(|| Entry::Router(Router::with_prefix(prefix)));
        match entry {
            Entry::Router(subrouter) => subrouter,
            Entry::Route(_) => unreachable!("the prefix was just checked to be free"),
        }
    }

    /// The registered subrouter prefix that matches `path` with the most
    /// bytes, if any.
    fn find_subrouter(&self, path: &Path) -> Option<&Path> {
        let mut found: Option<&Path> = None;
        for prefix in &self.subrouters {
            if found.map_or(0, |f| f.as_str().len()) < prefix.as_str().len()
                && path.has_prefix(prefix)
            {
                found = Some(prefix);
            }
        }
        found
    }

    /// Binds `handler` to `methods` at `path`, joined onto this router's
    /// prefix. The route is created on first use; registration delegates
    /// into a subrouter when one's prefix contains the path.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate method binding or on a duplicate parameter
    /// name in the path.
    pub fn register(&mut self, path: &str, methods: &[Method], handler: T)
    where
        T: Clone,
    {
        let path = self.prefix.join([path]);
        self.register_at(path, methods, handler);
    }

    fn register_at(&mut self, path: Path, methods: &[Method], handler: T)
    where
        T: Clone,
    {
        if let Some(container) = self.find_subrouter(&path).cloned() {
            match self.entries.get_mut(&container) {
                Some(Entry::Router(subrouter)) => subrouter.register_at(path, methods, handler),
                _ => unreachable!("subrouter prefixes always index router entries"),
            }
            return;
        }

        let entry = self.entries.entry(path.clone()).or_insert_with(|| {
            log::debug!("creating route at '{}'", path);
            Entry::Route(Route::new(path.clone()))
        });
        match entry {
            Entry::Route(route) => route.bind(methods, handler),
            Entry::Router(_) => {
                unreachable!("a path equal to a subrouter prefix is delegated above")
            }
        }
    }

    /// Binds a GET handler at `path`.
    pub fn get(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::GET], handler);
    }

    /// Binds a POST handler at `path`.
    pub fn post(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::POST], handler);
    }

    /// Binds a PUT handler at `path`.
    pub fn put(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::PUT], handler);
    }

    /// Binds a PATCH handler at `path`.
    pub fn patch(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::PATCH], handler);
    }

    /// Binds a DELETE handler at `path`.
    pub fn delete(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::DELETE], handler);
    }

    /// Binds a HEAD handler at `path`.
    pub fn head(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::HEAD], handler);
    }

    /// Binds an OPTIONS handler at `path`.
    pub fn options(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::OPTIONS], handler);
    }

    /// Binds a CONNECT handler at `path`.
    pub fn connect(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::CONNECT], handler);
    }

    /// Binds a TRACE handler at `path`.
    pub fn trace(&mut self, path: &str, handler: T)
    where
        T: Clone,
    {
        self.register(path, &[Method::TRACE], handler);
    }

    /// Routes one request, without running any handler.
    ///
    /// The raw path is normalized first; a non-canonical spelling turns
    /// into [`Dispatch::Redirect`] before any matching happens. Otherwise
    /// the request is delegated to the subrouter with the longest matching
    /// prefix, recursively, and finally matched against direct routes.
    /// Fallback handlers for the empty outcomes are resolved against the
    /// routers along the delegation chain, nearest first, at this call.
    pub fn dispatch(&self, method: &Method, raw_path: &str) -> Dispatch<'_, T> {
        self.dispatch_from(method, raw_path, ErrorHandlers::default())
    }

    fn dispatch_from<'router>(
        &'router self,
        method: &Method,
        raw_path: &str,
        inherited: ErrorHandlers<&'router T>,
    ) -> Dispatch<'router, T> {
        let path = Path::new(raw_path);
        if path.as_str() != raw_path {
            log::debug!("redirecting non-canonical '{}' to '{}'", raw_path, path);
            let permanent = *method == Method::GET || *method == Method::HEAD;
            return Dispatch::Redirect { location: path, permanent };
        }

        let fallbacks = self.error_handlers.as_ref().or(inherited);

        if let Some(prefix) = self.find_subrouter(&path) {
            log::trace!("delegating '{}' to subrouter '{}'", path, prefix);
            match self.entries.get(prefix) {
                Some(Entry::Router(subrouter)) => {
                    return subrouter.dispatch_from(method, raw_path, fallbacks);
                }
                _ => unreachable!("subrouter prefixes always index router entries"),
            }
        }

        for entry in self.entries.values() {
            if let Entry::Route(route) = entry {
                if route.path().matches(&path) {
                    return match route.dispatch(method, &path) {
                        Some((handler, params)) => Dispatch::Handle { handler, params },
                        None => Dispatch::MethodNotAllowed {
                            handler: fallbacks.method_not_allowed,
                        },
                    };
                }
            }
        }

        Dispatch::NotFound {
            handler: fallbacks.not_found,
        }
    }
}
