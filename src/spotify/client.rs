use std::{borrow::Borrow, collections::HashSet};

use reqwest::{Client, Url};
use serde_json::Value;

use crate::{
    Error, Res,
    config::{Config, RetryPolicy},
    spotify::{
        auth,
        paging::{self, CursorStyle},
        retry,
    },
    types::AccessToken,
    warning,
};

/// Spotify Web API client bound to a single access token.
///
/// Every request is an authenticated `GET` that is retried a fixed number of
/// times. Listings are drained page by page, in sequence, into one `Vec`.
pub struct SpotifyClient {
    token: AccessToken,
    http: Client,
    api_url: String,
    retry: RetryPolicy,
}

impl SpotifyClient {
    /// Creates a client for the public Spotify API with default settings.
    pub fn new(token: AccessToken) -> Res<Self> {
        Self::with_config(token, &Config::default())
    }

    /// Creates a client using the API base URL and retry policy of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the configured base URL is not an
    /// absolute URL.
    pub fn with_config(token: AccessToken, config: &Config) -> Res<Self> {
        let mut api_url = config.api_url.clone();
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        Url::parse(&api_url).map_err(|e| Error::InvalidUrl(format!("{api_url}: {e}")))?;

        Ok(Self {
            token,
            http: Client::new(),
            api_url,
            retry: config.retry,
        })
    }

    /// Runs the browser-based implicit grant flow and returns a client bound
    /// to the captured token.
    ///
    /// Opens Spotify's authorize page in the default browser and blocks until
    /// the local capture server on `127.0.0.1:43019` received the token. There
    /// is no timeout; an abandoned browser flow waits forever.
    ///
    /// # Errors
    ///
    /// - [`Error::Bind`] if the fixed port is taken
    /// - [`Error::AuthorizationDenied`] if the user declined access
    /// - [`Error::Serve`] if the capture server failed
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_env();
    /// let spotify = SpotifyClient::authorize(&config).await?;
    /// let me = spotify.get("me", &[]).await?;
    /// ```
    pub async fn authorize(config: &Config) -> Res<Self> {
        let token = auth::authorize(config).await?;
        Self::with_config(token, config)
    }

    /// Fetches a single resource and returns its JSON body.
    ///
    /// `path` is either relative to the API base (`"me"`,
    /// `"me/following?type=artist"`) or an absolute URL as returned in a
    /// page's `next` field. `params` are appended to any query string already
    /// present.
    ///
    /// # Retry Logic
    ///
    /// A network error, a non-2xx status or a body that is not JSON fails the
    /// attempt. Each failure is logged with a timestamp, followed by a fixed
    /// pause before the next attempt. After the last attempt the call returns
    /// [`Error::RetriesExhausted`], which callers treat as fatal.
    ///
    /// # Example
    ///
    /// ```
    /// let me = spotify.get("me", &[]).await?;
    /// println!("Logged in as {}", me["display_name"]);
    /// ```
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Res<Value> {
        let url = resolve_url(&self.api_url, path, params)?;
        self.fetch(url).await
    }

    /// Fetches every page of an offset-paginated listing.
    ///
    /// Requests `path` with `params`, then follows the `next` URL of each page
    /// verbatim (without `params`) until it is null. Items are concatenated in
    /// page order without deduplication.
    ///
    /// # Errors
    ///
    /// - [`Error::RetriesExhausted`] if any page cannot be fetched
    /// - [`Error::UnexpectedResponse`] if a page has no `items` array
    /// - [`Error::Pagination`] if a `next` URL repeats or the page limit of
    ///   the retry policy is exceeded
    ///
    /// # Example
    ///
    /// ```
    /// let albums = spotify.list("me/albums", &[("limit", "50")]).await?;
    /// ```
    pub async fn list(&self, path: &str, params: &[(&str, &str)]) -> Res<Vec<Value>> {
        let first = resolve_url(&self.api_url, path, params)?;
        let mut visited = HashSet::from([first.to_string()]);
        let mut page = self.fetch(first).await?;
        let mut items = paging::take_items(&mut page, path)?;
        let mut pages = 1;

        while let Some(next) = paging::next_url(&page) {
            let next_url = resolve_url(&self.api_url, &next, &[] as &[(&str, &str)])?;
            if !visited.insert(next_url.to_string()) {
                return Err(Error::Pagination(format!(
                    "{path}: `next` link {next} was already visited"
                )));
            }
            if pages >= self.retry.max_pages {
                return Err(Error::Pagination(format!(
                    "{path}: more than {} pages",
                    self.retry.max_pages
                )));
            }

            page = self.fetch(next_url).await?;
            items.extend(paging::take_items(&mut page, &next)?);
            pages += 1;
        }

        Ok(items)
    }

    /// Fetches every page of a cursor-paginated listing.
    ///
    /// Requests `path` with `params`, then re-requests the same `path` with the
    /// page's cursor parameters merged into `params` for as long as
    /// `style.has_more` holds. The loop ends the first time it does not.
    ///
    /// # Example
    ///
    /// ```
    /// let artists = spotify
    ///     .list_by_cursor(
    ///         "me/following?type=artist",
    ///         &[("limit", "50")],
    ///         &paging::Container::new("artists"),
    ///     )
    ///     .await?;
    /// ```
    pub async fn list_by_cursor<S>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        style: &S,
    ) -> Res<Vec<Value>>
    where
        S: CursorStyle + ?Sized,
    {
        let mut page = self.get(path, params).await?;
        let mut items = style.items(&page)?;
        let mut pages = 1;

        while style.has_more(&page) {
            if pages >= self.retry.max_pages {
                return Err(Error::Pagination(format!(
                    "{path}: more than {} pages",
                    self.retry.max_pages
                )));
            }

            let merged = paging::merge_params(style.next_params(&page), params);
            let url = resolve_url(&self.api_url, path, &merged)?;
            page = self.fetch(url).await?;
            items.extend(style.items(&page)?);
            pages += 1;
        }

        Ok(items)
    }

    async fn fetch(&self, url: Url) -> Res<Value> {
        let policy = self.retry;
        retry::retry_with_delay(
            &policy,
            || self.attempt(&url),
            |attempt, err| {
                warning!(
                    "Couldn't load URL: {} ({}) [attempt {}/{}]",
                    url,
                    err,
                    attempt,
                    policy.max_attempts.max(1)
                )
            },
        )
        .await
        .map_err(|exhausted| Error::RetriesExhausted {
            url: url.to_string(),
            attempts: exhausted.attempts,
            last: exhausted.last.to_string(),
        })
    }

    async fn attempt(&self, url: &Url) -> Res<Value> {
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(self.token.secret())
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turns a request path and query parameters into an absolute URL.
///
/// Paths that already start with `api_url`, or carry their own `http(s)://`
/// scheme, are used as they are. Anything else is appended to `api_url`.
/// Parameters are appended to the existing query string.
pub fn resolve_url<I, K, V>(api_url: &str, path: &str, params: I) -> Res<Url>
where
    I: IntoIterator,
    I::Item: Borrow<(K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let raw = if path.starts_with(api_url)
        || path.starts_with("https://")
        || path.starts_with("http://")
    {
        path.to_string()
    } else {
        format!("{}{}", api_url, path.trim_start_matches('/'))
    };

    let mut url = Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;

    let mut params = params.into_iter().peekable();
    if params.peek().is_some() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}
