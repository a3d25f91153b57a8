//! Applicant form workflow over a client link

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use visadesk_common::privacy::mask_link_token;
use visadesk_domain::{Ds160Section, LinkValidation, Result, SectionData, SectionUpdate};

use super::drafts::DraftStore;
use super::ds160::{validate_section, validate_submission};
use super::ports::ClientFormPort;

/// Result of saving one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored by the backend
    Saved,
    /// Backend unreachable; kept locally until the next save or submit
    Drafted,
}

/// A validated client link with local drafts merged over the saved sections
#[derive(Debug, Clone)]
pub struct OpenedForm {
    pub link: LinkValidation,
    /// Sections whose current values come from local drafts
    pub drafted: Vec<Ds160Section>,
}

impl OpenedForm {
    pub fn sections(&self) -> &BTreeMap<Ds160Section, SectionData> {
        &self.link.form_data
    }
}

/// Applicant-side DS-160 flow
///
/// Only failures where the backend was never reached fall back to drafts.
/// Rejections from the backend propagate unchanged.
pub struct ClientFormWorkflow {
    port: Arc<dyn ClientFormPort>,
    drafts: Arc<dyn DraftStore>,
}

impl ClientFormWorkflow {
    pub fn new(port: Arc<dyn ClientFormPort>, drafts: Arc<dyn DraftStore>) -> Self {
        Self { port, drafts }
    }

    /// Validate the link and merge local drafts over the saved sections
    ///
    /// # Errors
    /// Propagates the backend error for the validation call
    #[instrument(skip_all, fields(token = %mask_link_token(token)))]
    pub async fn open(&self, token: &str) -> Result<OpenedForm> {
        let mut link = self.port.validate(token).await?;
        let mut drafted = Vec::new();
        for (section, data) in self.drafts.get(token) {
            link.form_data.insert(section, data);
            drafted.push(section);
        }
        debug!(valid = link.valid, drafts = drafted.len(), "Client link opened");
        Ok(OpenedForm { link, drafted })
    }

    /// Validate and save one section
    ///
    /// # Errors
    /// - `Validation` before any request
    /// - any backend error other than a network-class failure
    #[instrument(skip_all, fields(token = %mask_link_token(token), section = %section))]
    pub async fn save_section(
        &self,
        token: &str,
        section: Ds160Section,
        data: SectionData,
    ) -> Result<SaveOutcome> {
        validate_section(section, &data)?;

        let update = SectionUpdate { section, data };
        match self.port.save_section(token, &update).await {
            Ok(()) => {
                self.drafts.remove(token, section);
                Ok(SaveOutcome::Saved)
            }
            Err(err) if err.is_network() => {
                warn!(error = %err, "Backend unreachable, keeping section as draft");
                self.drafts.put(token, section, update.data);
                Ok(SaveOutcome::Drafted)
            }
            Err(err) => Err(err),
        }
    }

    /// Validate the whole form, flush drafts and submit
    ///
    /// Drafts are cleared only after the backend accepts the submission.
    ///
    /// # Errors
    /// `Validation` for incomplete forms, otherwise the first backend error
    #[instrument(skip_all, fields(token = %mask_link_token(token)))]
    pub async fn submit(
        &self,
        token: &str,
        sections: &BTreeMap<Ds160Section, SectionData>,
    ) -> Result<()> {
        let mut merged = sections.clone();
        let drafts = self.drafts.get(token);
        merged.extend(drafts.clone());
        validate_submission(&merged)?;

        for (section, data) in drafts {
            self.port.save_section(token, &SectionUpdate { section, data }).await?;
            self.drafts.remove(token, section);
        }
        self.port.submit(token).await?;
        self.drafts.clear(token);
        info!("Client form submitted");
        Ok(())
    }
}
