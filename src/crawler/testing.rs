//! In-memory session for exercising the crawler without a network

use crate::crawler::session::{BrowserSession, LoadedPage, SessionError};
use crate::url::normalize_url;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

const HEALTHY_TEXT: &str =
    "This page has plenty of meaningful content for visitors to read and enjoy. ";

enum Route {
    Page {
        status_code: u16,
        html: String,
        buttons: HashMap<String, Option<String>>,
    },
    Redirect(String),
    Unreachable,
}

/// A scripted site: every route is declared up front, keyed by normalized URL
///
/// Unknown routes answer HTTP 404. Buttons either navigate to a target URL when
/// clicked or do nothing.
#[derive(Default)]
pub struct ScriptedSession {
    routes: HashMap<String, Route>,
    current: Option<LoadedPage>,
    navigations: Vec<String>,
    clicks: Vec<String>,
    closed: Arc<AtomicBool>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A healthy page with links and buttons
    pub fn site_page(
        mut self,
        url: &str,
        title: &str,
        links: &[(&str, &str)],
        buttons: &[(&str, Option<&str>)],
    ) -> Self {
        let link_html: String = links
            .iter()
            .map(|(text, href)| format!("<a href=\"{}\">{}</a>\n", href, text))
            .collect();
        let button_html: String = buttons
            .iter()
            .map(|(label, _)| format!("<button>{}</button>\n", label))
            .collect();
        let html = render(title, &format!("{}{}{}", HEALTHY_TEXT.repeat(3), link_html, button_html));

        self.routes.insert(
            key(url),
            Route::Page {
                status_code: 200,
                html,
                buttons: buttons
                    .iter()
                    .map(|(label, target)| (label.to_string(), target.map(str::to_string)))
                    .collect(),
            },
        );
        self
    }

    /// A page with literal markup and no clickable targets
    pub fn page(mut self, url: &str, status_code: u16, html: &str) -> Self {
        self.routes.insert(
            key(url),
            Route::Page {
                status_code,
                html: html.to_string(),
                buttons: HashMap::new(),
            },
        );
        self
    }

    pub fn healthy(self, url: &str, title: &str) -> Self {
        self.site_page(url, title, &[], &[])
    }

    /// A page answering `status_code` with otherwise healthy content
    pub fn status(mut self, url: &str, status_code: u16, title: &str) -> Self {
        self.routes.insert(
            key(url),
            Route::Page {
                status_code,
                html: render(title, &HEALTHY_TEXT.repeat(3)),
                buttons: HashMap::new(),
            },
        );
        self
    }

    /// A 200 page whose title marks it as an error page
    pub fn soft_error(mut self, url: &str) -> Self {
        self.routes.insert(
            key(url),
            Route::Page {
                status_code: 200,
                html: render("Error", &HEALTHY_TEXT.repeat(3)),
                buttons: HashMap::new(),
            },
        );
        self
    }

    pub fn blank(mut self, url: &str) -> Self {
        self.routes.insert(
            key(url),
            Route::Page {
                status_code: 200,
                html: render("Empty", ""),
                buttons: HashMap::new(),
            },
        );
        self
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.routes.insert(key(from), Route::Redirect(to.to_string()));
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.routes.insert(key(url), Route::Unreachable);
        self
    }

    /// Every URL passed to `navigate`, in order
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn clicks(&self) -> &[String] {
        &self.clicks
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Shared close flag that outlives the session once it is moved into a run
    pub fn close_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    fn load(&mut self, url: &str) -> Result<LoadedPage, SessionError> {
        let mut target = url.to_string();

        for _ in 0..10 {
            let (status_code, html) = match self.routes.get(&key(&target)) {
                Some(Route::Redirect(next)) => {
                    target = next.clone();
                    continue;
                }
                Some(Route::Unreachable) => {
                    return Err(SessionError::Navigation {
                        url: url.to_string(),
                        message: "Connection refused".to_string(),
                    })
                }
                Some(Route::Page {
                    status_code, html, ..
                }) => (*status_code, html.clone()),
                None => (404, render("Not Found", "")),
            };
            return self.land(&target, status_code, html);
        }

        Err(SessionError::Navigation {
            url: url.to_string(),
            message: "Too many redirects".to_string(),
        })
    }

    fn land(&mut self, url: &str, status_code: u16, html: String) -> Result<LoadedPage, SessionError> {
        let final_url = Url::parse(url).map_err(|e| SessionError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let page = LoadedPage {
            final_url,
            status_code,
            html,
        };
        self.current = Some(page.clone());
        Ok(page)
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<LoadedPage, SessionError> {
        self.navigations.push(url.to_string());
        self.load(url)
    }

    async fn click(&mut self, label: &str) -> Result<Option<LoadedPage>, SessionError> {
        let current = self.current.clone().ok_or(SessionError::NoPage)?;
        self.clicks.push(label.to_string());

        let target = match self.routes.get(&key(current.final_url.as_str())) {
            Some(Route::Page { buttons, .. }) => match buttons.get(label) {
                Some(target) => target.clone(),
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        match target {
            Some(target) => self.load(&target).map(Some),
            None => Ok(Some(current)),
        }
    }

    fn current_page(&self) -> Option<&LoadedPage> {
        self.current.as_ref()
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.closed.store(true, Ordering::SeqCst);
        self.current = None;
        Ok(())
    }
}

fn key(url: &str) -> String {
    normalize_url(url, None).into_string()
}

fn render(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}
