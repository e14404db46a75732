use crate::{Params, ParamsPos, Path};
use http::Method;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// A routable path pattern with one handler slot per HTTP method.
pub struct Route<T> {
    path: Path,
    params_pos: ParamsPos,
    handlers: HashMap<Method, T>,
}

impl<T> Debug for Route<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Route({:?})", &self.path))
    }
}

impl<T> Route<T> {
    /// Builds an empty route for `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` repeats a parameter name.
    pub fn new(path: Path) -> Self {
        let params_pos = path.params_pos();
        Self {
            path,
            params_pos,
            handlers: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn params_pos(&self) -> &ParamsPos {
        &self.params_pos
    }

    /// The methods with a bound handler, in no particular order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> + '_ {
        self.handlers.keys()
    }

    /// Binds `handler` to each of `methods`.
    ///
    /// # Panics
    ///
    /// Panics if any of the methods already has a handler bound.
    pub fn bind(&mut self, methods: &[Method], handler: T)
    where
        T: Clone,
    {
        for method in methods {
            if self.handlers.contains_key(method) {
                panic!("duplicate {} handler for route '{}'", method, self.path);
            }
            self.handlers.insert(method.clone(), handler.clone());
        }
    }

    /// The handler bound to `method`, along with the parameters captured
    /// from `path`. `None` when no handler is bound to the method.
    pub fn dispatch(&self, method: &Method, path: &Path) -> Option<(&T, Params)> {
        match self.handlers.get(method) {
            Some(handler) => Some((handler, self.extract_params(path))),
            None => {
                log::debug!("no {} binding for route '{}'", method, self.path);
                None
            }
        }
    }

    /// Reads the fields of `path` at this route's parameter positions.
    pub fn extract_params(&self, path: &Path) -> Params {
        let fields: Vec<&str> = path.fields().collect();
        self.params_pos
            .iter()
            .map(|(name, position)| (name, fields[position]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_extraction() {
        let cases: [(&str, &str, &[(&str, &str)]); 4] = [
            ("/", "/", &[]),
            ("/:id", "/123", &[("id", "123")]),
            ("/positions/:uuid", "/positions/uuid-here", &[("uuid", "uuid-here")]),
            (
                "/investments/:investmentId/positions/:positionId",
                "/investments/15/positions/foo",
                &[("investmentId", "15"), ("positionId", "foo")],
            ),
        ];

        for (pattern, path, expected) in cases {
            let route: Route<()> = Route::new(Path::new(pattern));
            let params = route.extract_params(&Path::new(path));
            let expected: Params = expected.iter().copied().collect();
            assert_eq!(params, expected, "{} against {}", pattern, path);
        }
    }

    #[test]
    fn dispatching() {
        let mut route = Route::new(Path::new("/positions/:id"));
        route.bind(&[Method::GET], 1);

        let path = Path::new("/positions/42");
        let (handler, params) = route.dispatch(&Method::GET, &path).unwrap();
        assert_eq!(*handler, 1);
        assert_eq!(params.get("id"), Some("42"));

        assert!(route.dispatch(&Method::DELETE, &path).is_none());
    }

    #[test]
    fn one_handler_across_methods() {
        let mut route = Route::new(Path::new("/positions"));
        route.bind(&[Method::PUT, Method::PATCH], 7);

        let path = Path::new("/positions");
        assert!(route.dispatch(&Method::PUT, &path).is_some());
        assert!(route.dispatch(&Method::PATCH, &path).is_some());
        assert!(route.dispatch(&Method::GET, &path).is_none());
        assert_eq!(route.methods().count(), 2);
    }

    #[test]
    #[should_panic(expected = "duplicate GET handler")]
    fn rebinding_a_method_panics() {
        let mut route = Route::new(Path::new("/positions"));
        route.bind(&[Method::GET], 1);
        route.bind(&[Method::GET], 2);
    }
}
