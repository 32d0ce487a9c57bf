//! Per-dialog state for recording purchases and sales.
//!
//! A dialog owns its line drafts, the per-line picker state and the
//! submission state machine:
//!
//! ```text
//! Idle -> Editing -> Submitting -> Idle      (success)
//!                               -> Editing   (failure)
//! ```
//!
//! While `Submitting`, edits and repeat submissions are refused until the
//! outcome is known.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use stockhub_catalog::{Product, ProductCatalog};
use stockhub_core::{DomainError, LineId, Money, ProductId, SalesmanId};
use stockhub_transactions::{
    BatchSummary, SubmitRequest, TransactionBatch, TransactionKind, TransactionLine, ValidatedBatch,
    Violations, aggregate, validate,
};

use crate::gateway::{GatewayError, SubmitAck, TransactionGateway};
use crate::submitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    /// Exactly one line, sent as a single request.
    Single,
    /// Any number of lines, sent as one bulk request.
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    Editing,
    Submitting,
}

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("no submission is in progress")]
    NotSubmitting,
    #[error("a single-item dialog holds exactly one line")]
    SingleLineOnly,
    #[error("unknown line {0}")]
    UnknownLine(LineId),
    #[error(transparent)]
    Invalid(Violations),
    #[error(transparent)]
    Request(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Lines were cleared; the caller should refresh its catalog.
    Submitted { count: usize, message: String },
    /// Lines were kept for editing.
    Failed { message: String },
}

impl SubmitOutcome {
    pub fn needs_refresh(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SubmitOutcome::Submitted { message, .. } | SubmitOutcome::Failed { message } => message,
        }
    }
}

/// Raw input of one line, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    pub line_id: LineId,
    pub product_id: Option<ProductId>,
    pub quantity: String,
    pub unit_price: String,
    pub date: NaiveDate,
}

impl LineDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            line_id: LineId::new(),
            product_id: None,
            quantity: String::new(),
            unit_price: String::new(),
            date,
        }
    }

    /// Parse the typed text into a line.
    ///
    /// Quantity text that is not a whole number becomes 0 and price text that
    /// is not an amount becomes no price, so both surface as validation
    /// violations rather than parse errors.
    pub fn to_line(&self, salesman_id: Option<SalesmanId>) -> TransactionLine {
        TransactionLine {
            line_id: self.line_id,
            product_id: self.product_id,
            quantity: self.quantity.trim().parse().unwrap_or(0),
            unit_price: self.unit_price.parse::<Money>().ok(),
            date: self.date,
            salesman_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineUiState {
    pub search: String,
    pub picker_open: bool,
}

#[derive(Debug)]
pub struct TransactionDialog {
    kind: TransactionKind,
    mode: DialogMode,
    state: DialogState,
    lines: Vec<LineDraft>,
    ui: HashMap<LineId, LineUiState>,
    salesman_id: Option<SalesmanId>,
    default_date: NaiveDate,
    error: Option<String>,
    notice: Option<String>,
    in_flight: usize,
}

impl TransactionDialog {
    pub fn new(kind: TransactionKind, mode: DialogMode, default_date: NaiveDate) -> Self {
        Self {
            kind,
            mode,
            state: DialogState::Idle,
            lines: Vec::new(),
            ui: HashMap::new(),
            salesman_id: None,
            default_date,
            error: None,
            notice: None,
            in_flight: 0,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn lines(&self) -> &[LineDraft] {
        &self.lines
    }

    pub fn ui(&self, line_id: LineId) -> Option<&LineUiState> {
        self.ui.get(&line_id)
    }

    pub fn salesman(&self) -> Option<SalesmanId> {
        self.salesman_id
    }

    /// Last error shown in the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last confirmation shown after a successful submission.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Start editing. A fresh dialog gets one empty line.
    pub fn open(&mut self) -> Result<(), DialogError> {
        self.ensure_editable()?;
        self.state = DialogState::Editing;
        self.error = None;
        self.notice = None;
        if self.lines.is_empty() {
            self.push_line();
        }
        Ok(())
    }

    /// Drop all input and go back to `Idle`. An in-flight request is not
    /// cancelled, so closing is refused until it resolves.
    pub fn close(&mut self) -> Result<(), DialogError> {
        self.ensure_editable()?;
        self.lines.clear();
        self.ui.clear();
        self.salesman_id = None;
        self.error = None;
        self.state = DialogState::Idle;
        Ok(())
    }

    pub fn add_line(&mut self) -> Result<LineId, DialogError> {
        self.ensure_editable()?;
        if self.mode == DialogMode::Single && !self.lines.is_empty() {
            return Err(DialogError::SingleLineOnly);
        }
        self.state = DialogState::Editing;
        Ok(self.push_line())
    }

    pub fn remove_line(&mut self, line_id: LineId) -> Result<(), DialogError> {
        self.ensure_editable()?;
        let index = self
            .lines
            .iter()
            .position(|l| l.line_id == line_id)
            .ok_or(DialogError::UnknownLine(line_id))?;
        self.lines.remove(index);
        self.ui.remove(&line_id);
        Ok(())
    }

    /// Pick `product` for a line and close its picker. Purchase lines with an
    /// empty price field get the product's price as a starting point.
    pub fn select_product(&mut self, line_id: LineId, product: &Product) -> Result<(), DialogError> {
        let kind = self.kind;
        let draft = self.draft_mut(line_id)?;
        draft.product_id = Some(product.id);
        if kind == TransactionKind::Purchase && draft.unit_price.trim().is_empty() {
            draft.unit_price = product.price.minor_units().to_string();
        }
        let ui = self.ui.entry(line_id).or_default();
        ui.search = product.name.clone();
        ui.picker_open = false;
        Ok(())
    }

    pub fn clear_product(&mut self, line_id: LineId) -> Result<(), DialogError> {
        self.draft_mut(line_id)?.product_id = None;
        self.ui.entry(line_id).or_default().search.clear();
        Ok(())
    }

    pub fn set_quantity(&mut self, line_id: LineId, text: impl Into<String>) -> Result<(), DialogError> {
        self.draft_mut(line_id)?.quantity = text.into();
        Ok(())
    }

    pub fn set_unit_price(&mut self, line_id: LineId, text: impl Into<String>) -> Result<(), DialogError> {
        self.draft_mut(line_id)?.unit_price = text.into();
        Ok(())
    }

    pub fn set_date(&mut self, line_id: LineId, date: NaiveDate) -> Result<(), DialogError> {
        self.draft_mut(line_id)?.date = date;
        Ok(())
    }

    /// Salesman for the whole dialog. Ignored for sales.
    pub fn set_salesman(&mut self, salesman_id: Option<SalesmanId>) -> Result<(), DialogError> {
        self.ensure_editable()?;
        self.salesman_id = salesman_id.filter(|s| s.is_set());
        Ok(())
    }

    /// Typing in the search box opens the picker.
    pub fn set_search(&mut self, line_id: LineId, text: impl Into<String>) -> Result<(), DialogError> {
        self.draft_mut(line_id)?;
        let ui = self.ui.entry(line_id).or_default();
        ui.search = text.into();
        ui.picker_open = true;
        Ok(())
    }

    /// Flip the picker and return whether it is now open.
    pub fn toggle_picker(&mut self, line_id: LineId) -> Result<bool, DialogError> {
        self.draft_mut(line_id)?;
        let ui = self.ui.entry(line_id).or_default();
        ui.picker_open = !ui.picker_open;
        Ok(ui.picker_open)
    }

    /// Products matching a line's search text.
    pub fn candidates<'a>(&self, line_id: LineId, catalog: &'a ProductCatalog) -> Vec<&'a Product> {
        let needle = self.ui.get(&line_id).map(|u| u.search.as_str()).unwrap_or("");
        catalog.iter().filter(|p| p.matches(needle)).collect()
    }

    pub fn batch(&self) -> TransactionBatch {
        let salesman_id = match self.kind {
            TransactionKind::Purchase => self.salesman_id,
            TransactionKind::Sale => None,
        };
        TransactionBatch::with_lines(
            self.kind,
            self.lines.iter().map(|d| d.to_line(salesman_id)).collect(),
        )
    }

    pub fn preview(&self, catalog: &ProductCatalog) -> BatchSummary {
        aggregate(&self.batch(), catalog)
    }

    /// Messages for one line, for inline display.
    pub fn line_errors(&self, line_id: LineId, catalog: &ProductCatalog) -> Vec<String> {
        let batch = self.batch();
        match validate(&batch, catalog) {
            Ok(()) => Vec::new(),
            Err(violations) => violations
                .for_line(&batch, line_id)
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Validate the drafts and move to `Submitting`.
    ///
    /// On a validation failure the first message becomes the form error and
    /// the dialog stays editable.
    pub fn begin_submit(&mut self, catalog: &ProductCatalog) -> Result<SubmitRequest, DialogError> {
        self.ensure_editable()?;

        let validated = match ValidatedBatch::new(self.batch(), catalog) {
            Ok(v) => v,
            Err(violations) => {
                self.error = Some(violations.first().to_string());
                self.state = DialogState::Editing;
                return Err(DialogError::Invalid(violations));
            }
        };
        let request = match self.mode {
            DialogMode::Single => SubmitRequest::single(&validated)?,
            DialogMode::Bulk => SubmitRequest::bulk(&validated)?,
        };

        self.state = DialogState::Submitting;
        self.in_flight = request.item_count();
        self.error = None;
        self.notice = None;
        debug!(kind = %self.kind, items = self.in_flight, "submission started");
        Ok(request)
    }

    /// Apply the outcome of the request returned by [`Self::begin_submit`].
    pub fn finish_submit(
        &mut self,
        result: Result<SubmitAck, GatewayError>,
    ) -> Result<SubmitOutcome, DialogError> {
        if self.state != DialogState::Submitting {
            return Err(DialogError::NotSubmitting);
        }
        let count = std::mem::take(&mut self.in_flight);

        let outcome = match result {
            Ok(ack) => {
                let message = ack
                    .message
                    .unwrap_or_else(|| format!("{count} {} item(s) recorded", self.kind));
                self.lines.clear();
                self.ui.clear();
                self.error = None;
                self.notice = Some(message.clone());
                self.state = DialogState::Idle;
                SubmitOutcome::Submitted { count, message }
            }
            Err(err) => {
                let message = err.user_message();
                self.error = Some(message.clone());
                self.state = DialogState::Editing;
                SubmitOutcome::Failed { message }
            }
        };
        Ok(outcome)
    }

    /// Validate, send once through `gateway` and apply the outcome.
    pub async fn submit(
        &mut self,
        gateway: &dyn TransactionGateway,
        catalog: &ProductCatalog,
    ) -> Result<SubmitOutcome, DialogError> {
        let request = self.begin_submit(catalog)?;
        let result = submitter::send(gateway, &request).await;
        self.finish_submit(result)
    }

    fn push_line(&mut self) -> LineId {
        let draft = LineDraft::new(self.default_date);
        let id = draft.line_id;
        self.lines.push(draft);
        self.ui.insert(id, LineUiState::default());
        id
    }

    fn ensure_editable(&self) -> Result<(), DialogError> {
        if self.state == DialogState::Submitting {
            return Err(DialogError::AlreadySubmitting);
        }
        Ok(())
    }

    fn draft_mut(&mut self, line_id: LineId) -> Result<&mut LineDraft, DialogError> {
        self.ensure_editable()?;
        self.lines
            .iter_mut()
            .find(|l| l.line_id == line_id)
            .ok_or(DialogError::UnknownLine(line_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use stockhub_catalog::{Category, Salesman, Unit};
    use stockhub_core::CategoryId;
    use stockhub_transactions::{TransactionRecord, Violation};

    use crate::gateway::FieldErrors;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 17).unwrap()
    }

    fn product(id: u64, name: &str, price: i64, qty: u64) -> Product {
        Product::new(
            ProductId::new(id),
            name,
            format!("SKU-{id}"),
            CategoryId::new(1),
            Unit::Pcs,
            Money::new(price),
            qty,
        )
        .unwrap()
    }

    fn catalog() -> ProductCatalog {
        ProductCatalog::from_products([product(1, "Rice 5kg", 65_000, 5), product(2, "Sugar 1kg", 14_000, 30)])
            .unwrap()
    }

    enum Reply {
        Accept(Option<&'static str>),
        Reject(&'static str, &'static str),
        Down,
    }

    struct FakeGateway {
        reply: Reply,
        sent: Mutex<Vec<SubmitRequest>>,
    }

    impl FakeGateway {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TransactionGateway for FakeGateway {
        async fn submit(&self, request: &SubmitRequest) -> Result<SubmitAck, GatewayError> {
            self.sent.lock().unwrap().push(request.clone());
            match self.reply {
                Reply::Accept(message) => Ok(SubmitAck {
                    message: message.map(str::to_string),
                }),
                Reply::Reject(field, message) => {
                    Err(GatewayError::Rejected(FieldErrors::new().with(field, message)))
                }
                Reply::Down => Err(GatewayError::Network("connection refused".into())),
            }
        }

        async fn products(&self) -> Result<Vec<Product>, GatewayError> {
            Ok(catalog().iter().cloned().collect())
        }

        async fn categories(&self) -> Result<Vec<Category>, GatewayError> {
            Ok(Vec::new())
        }

        async fn salesmen(&self) -> Result<Vec<Salesman>, GatewayError> {
            Ok(Vec::new())
        }

        async fn transactions(&self, _kind: TransactionKind) -> Result<Vec<TransactionRecord>, GatewayError> {
            Ok(Vec::new())
        }
    }

    fn bulk_purchase() -> TransactionDialog {
        let c = catalog();
        let mut dialog = TransactionDialog::new(TransactionKind::Purchase, DialogMode::Bulk, today());
        dialog.open().unwrap();
        let first = dialog.lines()[0].line_id;
        dialog.select_product(first, c.get(ProductId::new(1)).unwrap()).unwrap();
        dialog.set_quantity(first, "2").unwrap();
        dialog.set_unit_price(first, "1000").unwrap();
        let second = dialog.add_line().unwrap();
        dialog.select_product(second, c.get(ProductId::new(2)).unwrap()).unwrap();
        dialog.set_quantity(second, "3").unwrap();
        dialog.set_unit_price(second, "2000").unwrap();
        dialog
    }

    #[test]
    fn open_starts_editing_with_one_line() {
        let mut dialog = TransactionDialog::new(TransactionKind::Sale, DialogMode::Single, today());
        assert_eq!(dialog.state(), DialogState::Idle);
        dialog.open().unwrap();
        assert_eq!(dialog.state(), DialogState::Editing);
        assert_eq!(dialog.lines().len(), 1);
        assert_eq!(dialog.lines()[0].date, today());
        assert!(matches!(dialog.add_line(), Err(DialogError::SingleLineOnly)));
    }

    #[test]
    fn purchase_preview_totals_entered_prices() {
        let dialog = bulk_purchase();
        let summary = dialog.preview(&catalog());
        assert_eq!(summary.total, Money::new(8000));
        assert_eq!(summary.lines[0].stock_after, Some(7));
    }

    #[test]
    fn selecting_a_product_prefills_purchase_price_only_when_empty() {
        let c = catalog();
        let mut dialog = TransactionDialog::new(TransactionKind::Purchase, DialogMode::Single, today());
        dialog.open().unwrap();
        let line = dialog.lines()[0].line_id;
        dialog.set_search(line, "sug").unwrap();
        assert!(dialog.ui(line).unwrap().picker_open);
        assert_eq!(dialog.candidates(line, &c).len(), 1);

        dialog.select_product(line, c.get(ProductId::new(2)).unwrap()).unwrap();
        assert_eq!(dialog.lines()[0].unit_price, "14000");
        assert_eq!(dialog.ui(line).unwrap().search, "Sugar 1kg");
        assert!(!dialog.ui(line).unwrap().picker_open);

        dialog.set_unit_price(line, "13500").unwrap();
        dialog.select_product(line, c.get(ProductId::new(1)).unwrap()).unwrap();
        assert_eq!(dialog.lines()[0].unit_price, "13500");
    }

    #[test]
    fn non_numeric_quantity_is_a_violation() {
        let c = catalog();
        let mut dialog = TransactionDialog::new(TransactionKind::Sale, DialogMode::Single, today());
        dialog.open().unwrap();
        let line = dialog.lines()[0].line_id;
        dialog.select_product(line, c.get(ProductId::new(2)).unwrap()).unwrap();
        dialog.set_quantity(line, "two").unwrap();

        let err = dialog.begin_submit(&c).unwrap_err();
        match err {
            DialogError::Invalid(v) => assert_eq!(v.first(), &Violation::InvalidQuantity { line: 1 }),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dialog.state(), DialogState::Editing);
        assert_eq!(dialog.line_errors(line, &c).len(), 1);
    }

    #[test]
    fn fresh_line_without_product_is_a_violation() {
        let c = catalog();
        let mut dialog = TransactionDialog::new(TransactionKind::Sale, DialogMode::Single, today());
        dialog.open().unwrap();
        let line = dialog.lines()[0].line_id;
        assert_eq!(dialog.lines()[0].product_id, None);
        dialog.set_quantity(line, "1").unwrap();

        match dialog.begin_submit(&c).unwrap_err() {
            DialogError::Invalid(v) => {
                assert_eq!(v.first(), &Violation::MissingProduct { line: 1 });
                assert_eq!(v.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dialog.error(), Some("line 1: select a product"));
        assert_eq!(dialog.state(), DialogState::Editing);
        assert_eq!(dialog.lines().len(), 1);
    }

    #[test]
    fn oversell_shows_available_stock() {
        let c = catalog();
        let mut dialog = TransactionDialog::new(TransactionKind::Sale, DialogMode::Single, today());
        dialog.open().unwrap();
        let line = dialog.lines()[0].line_id;
        dialog.select_product(line, c.get(ProductId::new(1)).unwrap()).unwrap();
        dialog.set_quantity(line, "10").unwrap();

        assert!(dialog.begin_submit(&c).is_err());
        assert!(dialog.error().unwrap().contains("available: 5"));
    }

    #[test]
    fn second_begin_submit_is_rejected_until_finished() {
        let c = catalog();
        let mut dialog = bulk_purchase();
        let request = dialog.begin_submit(&c).unwrap();
        assert_eq!(request.path(), "purchases/bulk");
        assert_eq!(dialog.state(), DialogState::Submitting);

        assert!(matches!(dialog.begin_submit(&c), Err(DialogError::AlreadySubmitting)));
        let line = dialog.lines()[0].line_id;
        assert!(matches!(dialog.set_quantity(line, "9"), Err(DialogError::AlreadySubmitting)));
        assert!(matches!(dialog.close(), Err(DialogError::AlreadySubmitting)));

        dialog.finish_submit(Ok(SubmitAck::default())).unwrap();
        assert!(matches!(
            dialog.finish_submit(Ok(SubmitAck::default())),
            Err(DialogError::NotSubmitting)
        ));
    }

    #[tokio::test]
    async fn successful_submit_clears_lines_and_reports_count() {
        let gateway = FakeGateway::new(Reply::Accept(None));
        let mut dialog = bulk_purchase();

        let outcome = dialog.submit(&gateway, &catalog()).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                count: 2,
                message: "2 purchase item(s) recorded".into()
            }
        );
        assert!(outcome.needs_refresh());
        assert!(dialog.lines().is_empty());
        assert_eq!(dialog.state(), DialogState::Idle);
        assert_eq!(dialog.notice(), Some("2 purchase item(s) recorded"));
        assert_eq!(gateway.sent.lock().unwrap()[0].item_count(), 2);
    }

    #[tokio::test]
    async fn backend_message_is_used_as_notice() {
        let gateway = FakeGateway::new(Reply::Accept(Some("Sale recorded")));
        let c = catalog();
        let mut dialog = TransactionDialog::new(TransactionKind::Sale, DialogMode::Single, today());
        dialog.open().unwrap();
        let line = dialog.lines()[0].line_id;
        dialog.select_product(line, c.get(ProductId::new(2)).unwrap()).unwrap();
        dialog.set_quantity(line, "1").unwrap();

        let outcome = dialog.submit(&gateway, &c).await.unwrap();
        assert_eq!(outcome.message(), "Sale recorded");
        assert_eq!(gateway.sent.lock().unwrap()[0].path(), "sales");
    }

    #[tokio::test]
    async fn rejected_submit_keeps_lines_and_shows_first_error() {
        let gateway = FakeGateway::new(Reply::Reject("quantity", "insufficient stock"));
        let mut dialog = bulk_purchase();
        let before = dialog.lines().to_vec();

        let outcome = dialog.submit(&gateway, &catalog()).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "insufficient stock".into()
            }
        );
        assert_eq!(dialog.lines(), before.as_slice());
        assert_eq!(dialog.state(), DialogState::Editing);
        assert_eq!(dialog.error(), Some("insufficient stock"));
    }

    #[tokio::test]
    async fn transport_failure_leaves_dialog_editable() {
        let gateway = FakeGateway::new(Reply::Down);
        let mut dialog = bulk_purchase();

        let outcome = dialog.submit(&gateway, &catalog()).await.unwrap();
        assert!(!outcome.needs_refresh());
        assert_eq!(dialog.lines().len(), 2);
        assert!(dialog.add_line().is_ok());
    }

    #[test]
    fn salesman_only_applies_to_purchases() {
        let mut sale = TransactionDialog::new(TransactionKind::Sale, DialogMode::Single, today());
        sale.open().unwrap();
        sale.set_salesman(Some(SalesmanId::new(3))).unwrap();
        assert_eq!(sale.batch().lines[0].salesman_id, None);

        let mut purchase = bulk_purchase();
        purchase.set_salesman(Some(SalesmanId::new(3))).unwrap();
        assert!(purchase.batch().lines.iter().all(|l| l.salesman_id == Some(SalesmanId::new(3))));
    }

    #[test]
    fn remove_and_close_reset_state() {
        let mut dialog = bulk_purchase();
        let second = dialog.lines()[1].line_id;
        dialog.remove_line(second).unwrap();
        assert!(dialog.ui(second).is_none());
        assert!(matches!(dialog.remove_line(second), Err(DialogError::UnknownLine(_))));

        dialog.close().unwrap();
        assert_eq!(dialog.state(), DialogState::Idle);
        assert!(dialog.lines().is_empty());
    }
}
