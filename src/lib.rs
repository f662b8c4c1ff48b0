//! Whitespace issues Language Server implementation.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};
use tracing::{debug, info, warn};

mod document;
mod lsp;
pub(crate) mod settings;
pub mod whitespace;

pub use document::{Buffer, Change, DocumentStore, LineIndex};
pub use lsp::{
    apply_content_changes, minimal_edit, parse_arguments, to_diagnostics, CommandArgs,
    DIAGNOSTIC_SOURCE, DISPLAY_COMMAND, FIX_COMMAND,
};
pub use settings::{discover_settings, load_settings, parse_settings, Policy, Settings, SettingsError};
pub use whitespace::{IssueKind, Region, ScanMode, TextView, WhiteSpaces};

use whitespace::{DeferredScan, Scheduler};

#[derive(Clone)]
pub struct Backend {
    client: Client,
    documents: Arc<DocumentStore>,
    policy: Arc<OnceLock<Policy>>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            policy: Arc::new(OnceLock::new()),
        }
    }

    /// The policy discovered at initialization, or the defaults.
    fn policy(&self) -> Policy {
        self.policy.get().cloned().unwrap_or_default()
    }

    /// A copy of an open document's buffer.
    pub fn document(&self, uri: &Url) -> Option<Buffer> {
        self.documents.get(uri)
    }

    /// Scan a document, annotate the immediate results and publish them.
    /// Deferred scans publish again when they finish.
    async fn display(&self, uri: &Url, kinds: Option<&[IssueKind]>, mode: ScanMode) {
        let policy = self.policy();
        let mut scheduler = DeferredScans {
            backend: self.clone(),
            uri: uri.clone(),
        };
        let opened = self.documents.with_document(uri, |buffer| {
            WhiteSpaces::new(&policy).display(buffer, &mut scheduler, kinds, mode);
        });

        if opened.is_some() {
            self.publish_diagnostics_for(uri).await;
        }
    }

    /// Fix a scratch copy of the document and diff it against the original.
    fn fix_edit(&self, uri: &Url, kinds: Option<&[IssueKind]>) -> Option<TextEdit> {
        let policy = self.policy();
        self.documents
            .with_document(uri, |buffer| {
                let mut draft = buffer.clone();
                draft.transaction(|view, edit| WhiteSpaces::new(&policy).fix(view, edit, kinds));
                lsp::minimal_edit(buffer.line_index(), draft.text())
            })
            .flatten()
    }

    /// Publish the annotated region sets of a document.
    async fn publish_diagnostics_for(&self, uri: &Url) {
        let Some((diagnostics, version)) = self
            .documents
            .with_document(uri, |buffer| (lsp::to_diagnostics(buffer), buffer.version()))
        else {
            return;
        };

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(version))
            .await;
    }
}

/// Runs deferred scans on the tokio event loop after their delay.
///
/// Scans are never cancelled; each runs against whatever the document
/// holds when its timer fires.
struct DeferredScans {
    backend: Backend,
    uri: Url,
}

impl Scheduler for DeferredScans {
    fn schedule(&mut self, delay: Duration, scan: DeferredScan) {
        let backend = self.backend.clone();
        let uri = self.uri.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let ran = backend
                .documents
                .with_document(&uri, |buffer| scan.run(buffer));
            if ran.is_some() {
                backend.publish_diagnostics_for(&uri).await;
            }
        });
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract workspace root from params
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        let policy = match workspace_root {
            Some(root) => {
                let (settings, settings_dir) = settings::discover_settings(&root);
                info!("Using settings from {}", settings_dir.display());
                Policy::from_settings(&settings)
            }
            None => Policy::default(),
        };
        let _ = self.policy.set(policy);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        will_save: None,
                        will_save_wait_until: Some(true),
                        save: None,
                    },
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: lsp::all_commands(),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Whitespace language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        debug!("Document opened: {}", document.uri);

        let mut buffer = Buffer::new(document.text)
            .with_syntax(document.language_id)
            .with_version(document.version);
        if let Ok(path) = document.uri.to_file_path() {
            buffer = buffer.with_file_name(path.display().to_string());
        }
        self.documents.open(document.uri.clone(), buffer);

        self.display(&document.uri, None, ScanMode::Full).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        debug!("Document changed: {}", uri);

        let changes = params.content_changes;
        let synced = self.documents.with_document(&uri, |buffer| {
            lsp::apply_content_changes(buffer, changes);
            buffer.set_version(version);
        });
        if synced.is_none() {
            warn!("Change for unopened document: {}", uri);
            return;
        }

        self.display(&uri, None, ScanMode::Incremental).await;
    }

    async fn will_save_wait_until(
        &self,
        params: WillSaveTextDocumentParams,
    ) -> Result<Option<Vec<TextEdit>>> {
        let uri = &params.text_document.uri;
        debug!("Document about to save: {}", uri);

        Ok(self.fix_edit(uri, None).map(|edit| vec![edit]))
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);
        self.documents.close(&params.text_document.uri);
        // Clear diagnostics
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        debug!("Command: {} {:?}", params.command, params.arguments);

        match params.command.as_str() {
            DISPLAY_COMMAND => {
                let args = lsp::parse_arguments(&params.arguments).map_err(Error::invalid_params)?;
                self.display(&args.uri, args.kinds.as_deref(), ScanMode::Full)
                    .await;
            }
            FIX_COMMAND => {
                let args = lsp::parse_arguments(&params.arguments).map_err(Error::invalid_params)?;
                let Some(edit) = self.fix_edit(&args.uri, args.kinds.as_deref()) else {
                    return Ok(None);
                };

                let changes = HashMap::from([(args.uri, vec![edit])]);
                let workspace_edit = WorkspaceEdit {
                    changes: Some(changes),
                    ..Default::default()
                };
                match self.client.apply_edit(workspace_edit).await {
                    Ok(response) if !response.applied => {
                        warn!("Client rejected fix: {:?}", response.failure_reason);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Failed to apply fix: {}", e),
                }
            }
            _ => return Err(Error::method_not_found()),
        }

        Ok(None)
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(Backend::new)
}
