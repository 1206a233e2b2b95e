use std::cell::{OnceCell, RefCell};
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};

use crate::common::cookie::{Cookie, CookieProcessor, StandardCookieProcessor};
use crate::common::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, Header, HeaderMap, HeaderMapOps};
use crate::common::locale::{AcceptLanguage, Locale};
use crate::common::media_type::MediaType;
use crate::common::method::Method;
use crate::common::request::{HttpEntity, Request};
use crate::common::session::{Session, SessionManager};
use crate::common::uri::Uri;
use crate::http::body::RequestBody;
use crate::http::config::Config;
use crate::http::context::{HttpContext, REQUEST_CREATED_SESSION};
use crate::http::error::RequestError;
use crate::parse::form::parse_form;
use crate::util::multi_value::MultiValueMap;

/// Formats of the `HTTP-date` header value that are not RFC 1123: RFC 850 and asctime.
const OBSOLETE_DATE_FORMATS: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// A view over a received request. Every derived value is parsed on first use and kept for the
/// life of the view.
pub struct RequestView<'a> {
    request: &'a Request,
    method: Method,
    entity: Option<&'a dyn HttpEntity>,
    session_manager: &'a dyn SessionManager,
    cookie_processor: &'a dyn CookieProcessor,
    config: Config,
    context: RefCell<HttpContext>,
    uri: OnceCell<Uri>,
    query: OnceCell<MultiValueMap<String, String>>,
    accepts: OnceCell<Vec<MediaType>>,
    locales: OnceCell<Vec<Locale>>,
    parameters: OnceCell<MultiValueMap<String, String>>,
}

impl<'a> RequestView<'a> {
    /// Creates a view over the given request, finding sessions with the given manager.
    pub fn new(request: &'a Request, session_manager: &'a dyn SessionManager) -> RequestView<'a> {
        RequestView {
            request,
            method: Method::from_token(&request.method),
            entity: None,
            session_manager,
            cookie_processor: &StandardCookieProcessor,
            config: Config::default(),
            context: RefCell::new(HttpContext::new()),
            uri: OnceCell::new(),
            query: OnceCell::new(),
            accepts: OnceCell::new(),
            locales: OnceCell::new(),
            parameters: OnceCell::new(),
        }
    }

    /// Uses the given entity as the body instead of the entity of the request, whatever the method.
    pub fn with_entity(mut self, entity: &'a dyn HttpEntity) -> RequestView<'a> {
        self.entity = Some(entity);
        self
    }

    pub fn with_cookie_processor(mut self, cookie_processor: &'a dyn CookieProcessor) -> RequestView<'a> {
        self.cookie_processor = cookie_processor;
        self
    }

    pub fn with_config(mut self, config: Config) -> RequestView<'a> {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The request this view is over.
    pub fn request(&self) -> &'a Request {
        self.request
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The parsed request target. A target that can not be parsed is replaced with `scheme://host:ip/`.
    pub fn uri(&self) -> &Uri {
        self.uri.get_or_init(|| {
            Uri::parse(&self.request.uri).unwrap_or_else(|err| {
                warn!("Request target {:?} could not be parsed: {}", self.request.uri, err);
                Uri::placeholder()
            })
        })
    }

    pub fn path(&self) -> &str {
        self.uri().path()
    }

    /// Replaces the path of the URI. Query parameters already read are kept.
    pub fn set_path(&mut self, path: &str) {
        let uri = self.uri().with_path(path);
        self.uri = OnceCell::from(uri);
    }

    /// Gets the first value of a query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_map().get_first(name).map(String::as_str)
    }

    /// Gets every value of a query parameter.
    pub fn queries(&self, name: &str) -> &[String] {
        self.query_map().get(name)
    }

    pub fn query_names(&self) -> Vec<&str> {
        self.query_map().keys().map(String::as_str).collect()
    }

    pub fn query_map(&self) -> &MultiValueMap<String, String> {
        self.query.get_or_init(|| self.uri().params().clone())
    }

    pub fn headers(&self) -> &'a HeaderMap {
        &self.request.headers
    }

    /// Gets the first value of a header. Names ignore case.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.request.headers.get_first_header_value(&Header::from(name)).map(String::as_str)
    }

    /// Gets every value of a header, in the order they were received.
    pub fn headers_named(&self, name: &str) -> &'a [String] {
        self.request.headers.get_header_values(&Header::from(name))
    }

    /// Gets a header as an integer.
    pub fn int_header(&self, name: &str) -> Result<Option<i64>, RequestError> {
        self.header(name)
            .map(|value| value.trim().parse::<i64>().map_err(|_| invalid_header(name, value)))
            .transpose()
    }

    /// Gets a header as a date. RFC 1123, RFC 850 and asctime dates are accepted.
    pub fn date_header(&self, name: &str) -> Result<Option<DateTime<Utc>>, RequestError> {
        self.header(name)
            .map(|value| parse_http_date(value).ok_or_else(|| invalid_header(name, value)))
            .transpose()
    }

    /// The `Content-Length` of the request, or None if it is missing or not a number.
    pub fn content_length(&self) -> Option<u64> {
        let value = self.request.headers.get_first_header_value(&CONTENT_LENGTH)?;
        match value.trim().parse() {
            Ok(length) => Some(length),
            Err(_) => {
                debug!("Ignoring invalid content length {:?}", value);
                None
            }
        }
    }

    /// The `Content-Type` of the request, or None if it is missing or malformed.
    pub fn content_type(&self) -> Option<MediaType> {
        let value = self.request.headers.get_first_header_value(&CONTENT_TYPE)?;
        let media_type = MediaType::parse(value);
        if media_type.is_none() {
            debug!("Ignoring malformed content type {:?}", value);
        }
        media_type
    }

    /// The media types of every `Accept` header, most preferred first. Never empty, `*/*` if the client sent none.
    pub fn accepts(&self) -> &[MediaType] {
        self.accepts.get_or_init(|| {
            let accepts: Vec<MediaType> = self.request.headers.get_header_values(&ACCEPT).iter()
                .flat_map(|header| MediaType::parse_media_types(header))
                .collect();
            if accepts.is_empty() { vec![MediaType::all()] } else { accepts }
        })
    }

    /// The most preferred media type.
    pub fn accept(&self) -> &MediaType {
        // never empty
        &self.accepts()[0]
    }

    /// The locales of every `Accept-Language` header, most preferred first.
    /// Never empty, the configured default locale if the client sent none.
    pub fn accept_languages(&self) -> &[Locale] {
        self.locales.get_or_init(|| {
            let locales: Vec<Locale> = self.request.headers.get_header_values(&ACCEPT_LANGUAGE).iter()
                .flat_map(|header| AcceptLanguage::parse(header))
                .map(|language| language.locale)
                .collect();
            if locales.is_empty() { vec![self.config.default_locale.clone()] } else { locales }
        })
    }

    /// The most preferred locale.
    pub fn accept_language(&self) -> &Locale {
        // never empty
        &self.accept_languages()[0]
    }

    /// Every cookie sent, in the order they were sent.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookie_processor.parse_cookie_header(self.request.headers.get_header_values(&COOKIE))
    }

    /// Gets the first cookie with the given name, ignoring case.
    pub fn cookie(&self, name: &str) -> Option<Cookie> {
        self.cookies().into_iter().find(|cookie| cookie.name.eq_ignore_ascii_case(name))
    }

    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookie(name).map(|cookie| cookie.value)
    }

    /// The session of the request: one created while handling it, or else the one named by the session cookie.
    /// A session store that can not be read is treated as having no session.
    pub fn session(&self) -> Option<Arc<dyn Session>> {
        let created = self.context.borrow().get::<Arc<dyn Session>>(REQUEST_CREATED_SESSION).cloned();
        if created.is_some() {
            return created;
        }

        let id = self.cookie_value(&self.config.session_cookie).filter(|id| !id.is_empty())?;
        match self.session_manager.find_session(&id) {
            Ok(session) => session,
            Err(err) => {
                warn!("Session {} could not be found: {}", id, err);
                None
            }
        }
    }

    /// The session of the request if it is valid, otherwise a newly created session.
    pub fn valid_session(&self) -> Arc<dyn Session> {
        if let Some(session) = self.session().filter(|session| session.is_valid()) {
            return session;
        }

        let session = self.session_manager.create_session();
        debug!("Created session {}", session.id());
        self.context.borrow_mut().set(REQUEST_CREATED_SESSION, Arc::clone(&session));
        session
    }

    /// Gives the session of the request a new id and returns it.
    pub fn change_session_id(&self) -> Result<String, RequestError> {
        let session = self.session().ok_or(RequestError::NoSession)?;
        self.session_manager.change_session_id(session.as_ref());
        Ok(session.id())
    }

    pub fn is_session_valid(&self) -> bool {
        self.session().map_or(false, |session| session.is_valid())
    }

    /// Gets the first value of a parameter. Form body values come first and the query is used when the body has
    /// no value or an empty one.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        match self.body_parameters().get_first(name) {
            Some(value) if !value.is_empty() => Some(value.as_str()),
            _ => self.query(name),
        }
    }

    /// Gets every value of a parameter from the form body, or from the query if the body has none.
    pub fn parameters(&self, name: &str) -> &[String] {
        match self.body_parameters().get(name) {
            [] => self.queries(name),
            values => values,
        }
    }

    /// The parameters of the form body, or the query parameters if the body has none.
    pub fn parameter_map(&self) -> &MultiValueMap<String, String> {
        let parameters = self.body_parameters();
        if parameters.is_empty() { self.query_map() } else { parameters }
    }

    /// The names of the body parameters followed by the names of the query parameters, without repeats.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        for name in self.body_parameters().keys().chain(self.query_map().keys()) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// The body of the request. An entity given to the view is always used. Otherwise the entity of the request is
    /// used if the method allows a body.
    pub fn body(&self) -> Result<Option<RequestBody<'a>>, RequestError> {
        if let Some(entity) = self.entity {
            return Ok(Some(RequestBody::new(entity)));
        }
        if !self.method.allows_body() {
            return Err(RequestError::BodyNotAllowed(self.request.method.clone()));
        }
        Ok(self.request.entity.as_ref().map(|entity| RequestBody::new(entity)))
    }

    /// Gets a copy of an attribute of the request.
    pub fn attribute<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.context.borrow().get::<T>(key).cloned()
    }

    pub fn set_attribute<T: 'static>(&self, key: &str, value: T) {
        self.context.borrow_mut().set(key, value)
    }

    pub fn remove_attribute<T: 'static>(&self, key: &str) -> Option<T> {
        self.context.borrow_mut().remove(key)
    }

    fn body_parameters(&self) -> &MultiValueMap<String, String> {
        self.parameters.get_or_init(|| self.read_form_body())
    }

    /// Parses the body as a form if the method allows a body and the content type is a form.
    fn read_form_body(&self) -> MultiValueMap<String, String> {
        if !self.method.allows_body() {
            return MultiValueMap::new();
        }

        let is_form = self.content_type()
            .map_or(false, |content_type| MediaType::application_form_urlencoded().includes(&content_type));
        if !is_form {
            return MultiValueMap::new();
        }

        let text = match self.body() {
            Ok(Some(body)) => body.string(),
            Ok(None) => return MultiValueMap::new(),
            Err(err) => Err(err),
        };

        match text {
            Ok(text) => parse_form(&text),
            Err(err) => {
                warn!("Form body could not be read: {}", err);
                MultiValueMap::new()
            }
        }
    }
}

fn invalid_header(name: &str, value: &str) -> RequestError {
    RequestError::InvalidHeader { name: name.to_ascii_lowercase(), value: value.to_string() }
}

/// Parses an `HTTP-date` in any of the formats RFC 7231 requires recipients to accept.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Ok(date) = DateTime::parse_from_rfc2822(&value) {
        return Some(date.with_timezone(&Utc));
    }
    OBSOLETE_DATE_FORMATS.iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
        .map(|date| date.and_utc())
}
