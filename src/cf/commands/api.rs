//! `cf api [URL]`: show, set or unset the targeted Cloud Controller.

use super::CF_NAME;
use crate::actors::{ConfigActor, Warnings};
use crate::cloudcontroller::{CloudControllerClient, CloudControllerError};
use crate::error::{CfError, Result};
use std::io::Write;
use termtext::{subs, Ui};

/// The config operations `cf api` needs.
pub trait ApiConfigActor {
    fn set_target(
        &mut self,
        api: &str,
        skip_ssl_validation: bool,
    ) -> std::result::Result<(String, Warnings), CloudControllerError>;

    fn clear_target(&mut self);

    /// Endpoint and API version of the current target.
    fn target(&self) -> Option<(String, String)>;
}

impl<C: CloudControllerClient> ApiConfigActor for ConfigActor<C> {
    fn set_target(
        &mut self,
        api: &str,
        skip_ssl_validation: bool,
    ) -> std::result::Result<(String, Warnings), CloudControllerError> {
        ConfigActor::set_target(self, api, skip_ssl_validation)
    }

    fn clear_target(&mut self) {
        ConfigActor::clear_target(self)
    }

    fn target(&self) -> Option<(String, String)> {
        ConfigActor::target(self).map(|(api, version)| (api.to_string(), version.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiCommand {
    pub url: Option<String>,
    pub skip_ssl_validation: bool,
    pub unset: bool,
}

impl ApiCommand {
    pub fn execute<O: Write, E: Write>(
        &self,
        ui: &mut Ui<O, E>,
        actor: &mut impl ApiConfigActor,
    ) -> Result<()> {
        if self.unset {
            return self.clear_target(ui, actor);
        }
        match self.url.as_deref() {
            Some(url) => self.set_target(ui, actor, url),
            None => self.show_target(ui, actor),
        }
    }

    fn set_target<O: Write, E: Write>(
        &self,
        ui: &mut Ui<O, E>,
        actor: &mut impl ApiConfigActor,
        url: &str,
    ) -> Result<()> {
        ui.display_header_flavor_text(
            "Setting api endpoint to {{.API}}...",
            &[subs! { "API" => url }],
        )?;

        let api = process_url(url);
        let (api_version, warnings) = match actor.set_target(&api, self.skip_ssl_validation) {
            Ok(target) => target,
            Err(err) => return handle_error(ui, url, err),
        };

        for warning in &warnings {
            ui.display_error_message("{{.Warning}}", &[subs! { "Warning" => warning }])?;
        }

        if api.starts_with("http:") {
            ui.display_text(
                "Warning: Insecure http API endpoint detected: secure https API endpoints are recommended",
                &[],
            )?;
        }

        ui.display_ok()?;
        ui.display_newline()?;
        display_target(ui, &api, &api_version)?;
        Ok(())
    }

    fn clear_target<O: Write, E: Write>(
        &self,
        ui: &mut Ui<O, E>,
        actor: &mut impl ApiConfigActor,
    ) -> Result<()> {
        ui.display_header_flavor_text("Unsetting api endpoint...", &[])?;
        actor.clear_target();
        ui.display_ok()?;
        Ok(())
    }

    fn show_target<O: Write, E: Write>(
        &self,
        ui: &mut Ui<O, E>,
        actor: &impl ApiConfigActor,
    ) -> Result<()> {
        match actor.target() {
            Some((api, api_version)) => display_target(ui, &api, &api_version)?,
            None => ui.display_text(
                "No api endpoint set. Use '{{.Name}}' to set an endpoint",
                &[subs! { "Name" => format!("{CF_NAME} api") }],
            )?,
        }
        Ok(())
    }
}

/// URLs typed without a scheme get `https://`. Trailing slashes are dropped,
/// so the endpoint shown matches the one stored.
pub fn process_url(url: &str) -> String {
    let url = url.trim_end_matches('/');
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn display_target<O: Write, E: Write>(
    ui: &mut Ui<O, E>,
    api: &str,
    api_version: &str,
) -> Result<()> {
    ui.display_text(
        "API endpoint: {{.APIEndpoint}} (API version: {{.APIVersion}})",
        &[subs! { "APIEndpoint" => api, "APIVersion" => api_version }],
    )?;
    Ok(())
}

fn handle_error<O: Write, E: Write>(
    ui: &mut Ui<O, E>,
    url: &str,
    err: CloudControllerError,
) -> Result<()> {
    tracing::debug!(error = %err, "setting api endpoint failed");
    match err {
        CloudControllerError::UnverifiedServer { .. } => {
            ui.display_error_message(
                "Invalid SSL Cert for {{.API}}\nTIP: Use 'cf api --skip-ssl-validation' to continue with an insecure API endpoint",
                &[subs! { "API" => url }],
            )?;
        }
        CloudControllerError::Request { .. } => {
            ui.display_error_message("{{.Error}}", &[subs! { "Error" => err.to_string() }])?;
            ui.display_error_message(
                "TIP: If you are behind a firewall and require an HTTP proxy, verify the https_proxy environment variable is correctly set. Else, check your network connection.",
                &[],
            )?;
        }
    }
    Err(CfError::Failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termtext::{ColorPolicy, EmbeddedCatalogs, UiSettings};

    type BufferUi = Ui<Vec<u8>, Vec<u8>>;

    #[derive(Default)]
    struct FakeActor {
        error: Option<CloudControllerError>,
        warnings: Warnings,
        current: Option<(String, String)>,
        calls: Vec<(String, bool)>,
    }

    impl ApiConfigActor for FakeActor {
        fn set_target(
            &mut self,
            api: &str,
            skip_ssl_validation: bool,
        ) -> std::result::Result<(String, Warnings), CloudControllerError> {
            self.calls.push((api.to_string(), skip_ssl_validation));
            if let Some(err) = &self.error {
                return Err(err.clone());
            }
            self.current = Some((api.to_string(), "2.54.0".to_string()));
            Ok(("2.54.0".to_string(), self.warnings.clone()))
        }

        fn clear_target(&mut self) {
            self.current = None;
        }

        fn target(&self) -> Option<(String, String)> {
            self.current.clone()
        }
    }

    fn test_ui() -> BufferUi {
        Ui::for_test(Vec::new(), Vec::new())
    }

    fn french_ui() -> BufferUi {
        Ui::with_sinks(
            &UiSettings::new(ColorPolicy::Disabled, "fr-FR"),
            &EmbeddedCatalogs,
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    fn out(ui: &BufferUi) -> &str {
        std::str::from_utf8(ui.out()).unwrap()
    }

    fn err(ui: &BufferUi) -> &str {
        std::str::from_utf8(ui.err()).unwrap()
    }

    fn set(url: &str) -> ApiCommand {
        ApiCommand {
            url: Some(url.to_string()),
            ..ApiCommand::default()
        }
    }

    #[test]
    fn test_process_url() {
        assert_eq!(process_url("api.example.com"), "https://api.example.com");
        assert_eq!(process_url("http://api.example.com"), "http://api.example.com");
        assert_eq!(process_url("https://api.example.com"), "https://api.example.com");
        assert_eq!(process_url("https://api.example.com/"), "https://api.example.com");
        assert_eq!(process_url("api.example.com//"), "https://api.example.com");
    }

    #[test]
    fn test_trailing_slash_matches_stored_target() {
        let mut ui = test_ui();
        let mut actor = FakeActor::default();

        set("https://api.example.com/").execute(&mut ui, &mut actor).unwrap();
        ApiCommand::default().execute(&mut ui, &mut actor).unwrap();

        assert_eq!(actor.calls, vec![("https://api.example.com".to_string(), false)]);
        let lines: Vec<&str> = out(&ui).lines().collect();
        assert_eq!(lines[0], "Setting api endpoint to https://api.example.com/...");
        assert_eq!(
            lines[3],
            "API endpoint: https://api.example.com (API version: 2.54.0)"
        );
        assert_eq!(lines[3], lines[4]);
    }

    #[test]
    fn test_sets_target_with_https_prefix() {
        let mut ui = test_ui();
        let mut actor = FakeActor::default();

        set("api.example.com").execute(&mut ui, &mut actor).unwrap();

        assert_eq!(actor.calls, vec![("https://api.example.com".to_string(), false)]);
        assert_eq!(
            out(&ui),
            "Setting api endpoint to api.example.com...\n\
             OK\n\
             \n\
             API endpoint: https://api.example.com (API version: 2.54.0)\n"
        );
        assert_eq!(err(&ui), "");
    }

    #[test]
    fn test_passes_skip_ssl_validation() {
        let mut ui = test_ui();
        let mut actor = FakeActor::default();
        let cmd = ApiCommand {
            skip_ssl_validation: true,
            ..set("https://api.example.com")
        };

        cmd.execute(&mut ui, &mut actor).unwrap();

        assert_eq!(actor.calls, vec![("https://api.example.com".to_string(), true)]);
    }

    #[test]
    fn test_warns_about_http_endpoints() {
        let mut ui = test_ui();
        let mut actor = FakeActor::default();

        set("http://api.example.com").execute(&mut ui, &mut actor).unwrap();

        assert_eq!(
            out(&ui),
            "Setting api endpoint to http://api.example.com...\n\
             Warning: Insecure http API endpoint detected: secure https API endpoints are recommended\n\
             OK\n\
             \n\
             API endpoint: http://api.example.com (API version: 2.54.0)\n"
        );
    }

    #[test]
    fn test_server_warnings_go_to_err() {
        let mut ui = test_ui();
        let mut actor = FakeActor {
            warnings: vec!["deprecated endpoint".to_string()],
            ..FakeActor::default()
        };

        set("api.example.com").execute(&mut ui, &mut actor).unwrap();

        assert_eq!(err(&ui), "deprecated endpoint\n");
    }

    #[test]
    fn test_unverified_server() {
        let mut ui = test_ui();
        let mut actor = FakeActor {
            error: Some(CloudControllerError::UnverifiedServer {
                url: "https://api.example.com/v2/info".to_string(),
            }),
            ..FakeActor::default()
        };

        let result = set("api.example.com").execute(&mut ui, &mut actor);

        assert!(matches!(result, Err(CfError::Failed)));
        assert_eq!(out(&ui), "Setting api endpoint to api.example.com...\n");
        assert_eq!(
            err(&ui),
            "Invalid SSL Cert for api.example.com\n\
             TIP: Use 'cf api --skip-ssl-validation' to continue with an insecure API endpoint\n"
        );
    }

    #[test]
    fn test_request_error() {
        let mut ui = test_ui();
        let mut actor = FakeActor {
            error: Some(CloudControllerError::Request {
                url: "https://api.example.com/v2/info".to_string(),
                message: "I am an error".to_string(),
            }),
            ..FakeActor::default()
        };

        let result = set("api.example.com").execute(&mut ui, &mut actor);

        assert!(matches!(result, Err(CfError::Failed)));
        assert_eq!(
            err(&ui),
            "Request error: I am an error\n\
             TIP: If you are behind a firewall and require an HTTP proxy, verify the https_proxy environment variable is correctly set. Else, check your network connection.\n"
        );
    }

    #[test]
    fn test_error_text_is_not_treated_as_a_template() {
        let mut ui = test_ui();
        let mut actor = FakeActor {
            error: Some(CloudControllerError::Request {
                url: "https://api.example.com/v2/info".to_string(),
                message: "unexpected {{.Token}}".to_string(),
            }),
            ..FakeActor::default()
        };

        let _ = set("api.example.com").execute(&mut ui, &mut actor);

        assert!(err(&ui).starts_with("Request error: unexpected {{.Token}}\n"));
    }

    #[test]
    fn test_unset() {
        let mut ui = test_ui();
        let mut actor = FakeActor {
            current: Some(("https://api.example.com".into(), "2.54.0".into())),
            ..FakeActor::default()
        };
        let cmd = ApiCommand {
            unset: true,
            ..ApiCommand::default()
        };

        cmd.execute(&mut ui, &mut actor).unwrap();

        assert_eq!(actor.current, None);
        assert!(actor.calls.is_empty());
        assert_eq!(out(&ui), "Unsetting api endpoint...\nOK\n");
    }

    #[test]
    fn test_shows_current_target() {
        let mut ui = test_ui();
        let mut actor = FakeActor {
            current: Some(("https://api.example.com".into(), "2.54.0".into())),
            ..FakeActor::default()
        };

        ApiCommand::default().execute(&mut ui, &mut actor).unwrap();

        assert_eq!(
            out(&ui),
            "API endpoint: https://api.example.com (API version: 2.54.0)\n"
        );
    }

    #[test]
    fn test_no_target() {
        let mut ui = test_ui();
        let mut actor = FakeActor::default();

        ApiCommand::default().execute(&mut ui, &mut actor).unwrap();

        assert_eq!(
            out(&ui),
            "No api endpoint set. Use 'cf api' to set an endpoint\n"
        );
    }

    #[test]
    fn test_french_output() {
        let mut ui = french_ui();
        let mut actor = FakeActor::default();

        set("api.example.com").execute(&mut ui, &mut actor).unwrap();

        assert_eq!(
            out(&ui),
            "Définition du noeud final d'API sur api.example.com...\n\
             OK\n\
             \n\
             Noeud final d'API : https://api.example.com (version d'API : 2.54.0)\n"
        );
    }

    #[test]
    fn test_french_unverified_server() {
        let mut ui = french_ui();
        let mut actor = FakeActor {
            error: Some(CloudControllerError::UnverifiedServer {
                url: "https://api.example.com/v2/info".to_string(),
            }),
            ..FakeActor::default()
        };

        let result = set("api.example.com").execute(&mut ui, &mut actor);

        assert!(matches!(result, Err(CfError::Failed)));
        assert_eq!(
            err(&ui),
            "Certificat SSL non valide pour api.example.com\n\
             ASTUCE : utilisez 'cf api --skip-ssl-validation' pour continuer avec un noeud final d'API non sécurisé\n"
        );
    }

    #[test]
    fn test_french_http_warning() {
        let mut ui = french_ui();
        let mut actor = FakeActor::default();

        set("http://api.example.com").execute(&mut ui, &mut actor).unwrap();

        assert!(out(&ui).contains(
            "Avertissement : noeud final d'API http non sécurisé détecté : \
             les noeuds finaux d'API https sécurisés sont recommandés\n"
        ));
    }

    #[test]
    fn test_french_request_error() {
        let mut ui = french_ui();
        let mut actor = FakeActor {
            error: Some(CloudControllerError::Request {
                url: "https://api.example.com/v2/info".to_string(),
                message: "I am an error".to_string(),
            }),
            ..FakeActor::default()
        };

        let _ = set("api.example.com").execute(&mut ui, &mut actor);

        assert!(err(&ui).starts_with("Request error: I am an error\nASTUCE : si vous êtes"));
    }

    #[test]
    fn test_flavor_text_highlights_url() {
        let mut ui: BufferUi = Ui::with_sinks(
            &UiSettings::new(ColorPolicy::Enabled, ""),
            &EmbeddedCatalogs,
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let mut actor = FakeActor::default();

        set("api.example.com").execute(&mut ui, &mut actor).unwrap();

        let first_line = out(&ui).lines().next().unwrap().to_string();
        assert!(first_line.contains("\x1b[36m"));
        assert_eq!(
            console::strip_ansi_codes(&first_line),
            "Setting api endpoint to api.example.com..."
        );
    }
}
