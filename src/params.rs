use http::Request;
use smartstring::alias::String as SmartString;

/// Parameter names of a route pattern, each with the field position it
/// occupies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParamsPos(Vec<(SmartString, usize)>);

impl ParamsPos {
    pub fn get(&self, name: &str) -> Option<usize> {
        self.0
            .iter()
            .find_map(|(n, position)| (n == name).then_some(*position))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.0.iter().map(|(name, position)| (&**name, *position))
    }

    pub(crate) fn insert(&mut self, name: &str, position: usize) {
        self.0.push((SmartString::from(name), position));
    }
}

/// Parameter values captured from a request path.
///
/// A router attaches these to the request extensions before the handler
/// runs; retrieve them with [`params`] or [`RequestParamsExt`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(Vec<(SmartString, SmartString)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find_map(|(n, value)| (n == name).then_some(&**value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(name, value)| (&**name, &**value))
    }

    pub(crate) fn insert(&mut self, name: &str, value: &str) {
        self.0.push((SmartString::from(name), SmartString::from(value)));
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut params = Params::default();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// The parameters captured for `req`.
///
/// # Panics
///
/// Panics if `req` was not dispatched through a router, since only routing
/// attaches the captured parameters.
pub fn params<B>(req: &Request<B>) -> &Params {
    req.extensions()
        .get::<Params>()
        .expect("params are only available on requests dispatched through a Router")
}

/// Parameter accessors on the request itself.
pub trait RequestParamsExt {
    /// All captured parameters. Panics like [`params`] when the request
    /// never went through a router.
    fn params(&self) -> &Params;

    /// One captured parameter by name.
    fn param(&self, name: &str) -> Option<&str> {
        self.params().get(name)
    }
}

impl<B> RequestParamsExt for Request<B> {
    fn params(&self) -> &Params {
        params(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_iter() {
        let params: Params = [("investmentId", "some-id"), ("positionId", "other-id")]
            .into_iter()
            .collect();

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("investmentId"), Some("some-id"));
        assert_eq!(params.get("positionId"), Some("other-id"));
        assert_eq!(params.get("missing"), None);

        let pairs: Vec<(&str, &str)> = params.iter().collect();
        assert_eq!(pairs, [("investmentId", "some-id"), ("positionId", "other-id")]);
    }

    #[test]
    #[should_panic(expected = "dispatched through a Router")]
    fn accessing_params_off_router_panics() {
        let req = Request::builder().uri("/positions").body(()).unwrap();
        params(&req);
    }
}
