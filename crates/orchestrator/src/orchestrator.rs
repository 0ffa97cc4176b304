//! The staged conversation flow, from greeting to delivered PDF.

use chrono::Utc;
use database::{conversation, invoice, product, Database, DatabaseError, NewInvoice, NewInvoiceItem};
use invoice_core::{compute_totals, parse, FoundProduct, InvoiceDraft, Stage};
use pdf_render::{InvoicePayload, PayloadItem};
use tracing::{info, warn};

use crate::error::OrchestratorError;
use crate::renderer::DocumentRenderer;
use crate::replies;
use crate::sender::MessageSender;

/// One incoming chat message, reduced to what the flow needs.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Telegram user id of whoever sent the message.
    pub sender_id: i64,
    /// Chat to reply into.
    pub chat_id: i64,
    /// Message text.
    pub text: String,
}

/// Drives the invoice dialogue for the single authorized operator.
///
/// Each message is interpreted against the operator's stored stage:
/// commands work from anywhere, everything else goes to the handler for
/// the current stage. Invalid input re-prompts without advancing; a
/// draft missing data its stage requires is dropped and the operator is
/// asked to start over.
pub struct Orchestrator<S: MessageSender, R: DocumentRenderer> {
    /// Conversation state, catalog, and invoice store.
    db: Database,
    /// Transport for replies and the finished document.
    sender: S,
    /// PDF renderer.
    renderer: R,
    /// Telegram user id allowed to use the bot.
    operator_id: i64,
}

impl<S: MessageSender, R: DocumentRenderer> Orchestrator<S, R> {
    pub fn new(db: Database, sender: S, renderer: R, operator_id: i64) -> Self {
        Self {
            db,
            sender,
            renderer,
            operator_id,
        }
    }

    /// Process one incoming message end-to-end.
    ///
    /// User mistakes are answered with a corrective reply and return
    /// `Ok`; an `Err` means infrastructure trouble (store or transport)
    /// and the caller decides whether to keep polling.
    pub async fn process(&self, message: InboundMessage) -> Result<(), OrchestratorError> {
        if message.sender_id != self.operator_id {
            info!("Rejecting message from unauthorized user {}", message.sender_id);
            return self.reply(message.chat_id, replies::UNAUTHORIZED).await;
        }

        if let Err(e) = self.sender.send_typing(message.chat_id).await {
            warn!("Failed to send typing indicator: {}", e);
        }

        let text = message.text.trim().to_string();

        // Commands work regardless of stage.
        match text.as_str() {
            "/start" | "/new" => {
                conversation::set_state(
                    self.db.pool(),
                    message.sender_id,
                    Stage::AwaitingCustomerInfo,
                    &InvoiceDraft::default(),
                )
                .await?;
                return self.reply(message.chat_id, replies::WELCOME).await;
            }
            "/cancel" => {
                conversation::clear_state(self.db.pool(), message.sender_id).await?;
                return self.reply(message.chat_id, replies::CANCELLED).await;
            }
            "/help" => {
                return self.reply(message.chat_id, replies::HELP_TEXT).await;
            }
            _ => {}
        }

        let state = match conversation::get_state(self.db.pool(), message.sender_id).await {
            Ok(state) => state,
            Err(DatabaseError::InvalidRecord { .. }) | Err(DatabaseError::Json(_)) => {
                warn!(
                    "Dropping undecodable conversation state for user {}",
                    message.sender_id
                );
                return self.reset_session(&message).await;
            }
            Err(e) => return Err(e.into()),
        };

        // No stored state: treat the first message as customer info.
        let (stage, draft) = match state {
            Some(state) => (state.stage, state.draft),
            None => (Stage::AwaitingCustomerInfo, InvoiceDraft::default()),
        };

        match stage {
            Stage::AwaitingCustomerInfo => self.handle_customer_info(&message, &text).await,
            Stage::AwaitingProducts => self.handle_products(&message, draft, &text).await,
            Stage::AwaitingQuantity => self.handle_quantity(&message, draft, &text).await,
            Stage::AwaitingDeliveryCharge => self.handle_delivery(&message, draft, &text).await,
            Stage::AwaitingDiscount => self.handle_discount(&message, draft, &text).await,
            Stage::AwaitingConfirmation => self.handle_confirmation(&message, draft, &text).await,
        }
    }

    async fn handle_customer_info(
        &self,
        message: &InboundMessage,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        let Some(info) = parse::parse_customer_info(text) else {
            return self
                .reply(message.chat_id, replies::INVALID_CUSTOMER_FORMAT)
                .await;
        };
        if !parse::is_valid_phone(&info.phone) {
            return self.reply(message.chat_id, replies::INVALID_PHONE).await;
        }

        // Accepting customer info always begins a fresh draft.
        let draft = InvoiceDraft {
            customer_info: Some(info.clone()),
            ..Default::default()
        };
        conversation::set_state(
            self.db.pool(),
            message.sender_id,
            Stage::AwaitingProducts,
            &draft,
        )
        .await?;
        self.reply(message.chat_id, &replies::customer_saved(&info))
            .await
    }

    async fn handle_products(
        &self,
        message: &InboundMessage,
        mut draft: InvoiceDraft,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        if draft.customer_info.is_none() {
            return self.reset_session(message).await;
        }

        let terms = parse::tokenize_product_query(text);
        if terms.is_empty() {
            return self
                .reply(message.chat_id, replies::EMPTY_PRODUCT_QUERY)
                .await;
        }

        // Every term is one catalog search; all hits are listed, in order,
        // duplicates included.
        let mut found: Vec<FoundProduct> = Vec::new();
        for term in &terms {
            match product::search(self.db.pool(), term).await {
                Ok(products) => {
                    found.extend(products.into_iter().map(|p| FoundProduct {
                        id: p.id,
                        name: p.name,
                        color: p.color,
                        warranty: p.warranty,
                        selling_price: p.selling_price,
                    }));
                }
                Err(e) => {
                    warn!("Catalog search failed for {:?}: {}", term, e);
                    return self.reply(message.chat_id, replies::SEARCH_FAILED).await;
                }
            }
        }

        if found.is_empty() {
            return self
                .reply(message.chat_id, replies::NO_PRODUCTS_FOUND)
                .await;
        }

        let listing = replies::products_found(&found);
        draft.found_products = found;
        draft.quantities.clear();
        conversation::set_state(
            self.db.pool(),
            message.sender_id,
            Stage::AwaitingQuantity,
            &draft,
        )
        .await?;
        self.reply(message.chat_id, &listing).await
    }

    async fn handle_quantity(
        &self,
        message: &InboundMessage,
        mut draft: InvoiceDraft,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        if draft.found_products.is_empty() {
            return self.reset_session(message).await;
        }

        let Some(entries) = parse::parse_quantities(text, draft.found_products.len()) else {
            return self.reply(message.chat_id, replies::INVALID_QUANTITY).await;
        };

        // Positions were parsed as typed; check them against what was
        // actually listed before accepting anything.
        if let Some(bad) = entries
            .iter()
            .find(|e| e.product_index >= draft.found_products.len())
        {
            let reply =
                replies::invalid_product_number(bad.product_index + 1, draft.found_products.len());
            return self.reply(message.chat_id, &reply).await;
        }

        draft.quantities = entries;
        conversation::set_state(
            self.db.pool(),
            message.sender_id,
            Stage::AwaitingDeliveryCharge,
            &draft,
        )
        .await?;
        self.reply(message.chat_id, &replies::delivery_prompt())
            .await
    }

    async fn handle_delivery(
        &self,
        message: &InboundMessage,
        mut draft: InvoiceDraft,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        if draft.quantities.is_empty() {
            return self.reset_session(message).await;
        }

        let Some(charge) = parse::parse_delivery_choice(text) else {
            return self
                .reply(message.chat_id, replies::INVALID_DELIVERY_CHOICE)
                .await;
        };

        draft.delivery_charge = Some(charge);
        conversation::set_state(
            self.db.pool(),
            message.sender_id,
            Stage::AwaitingDiscount,
            &draft,
        )
        .await?;
        self.reply(message.chat_id, replies::DISCOUNT_PROMPT).await
    }

    async fn handle_discount(
        &self,
        message: &InboundMessage,
        mut draft: InvoiceDraft,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        if draft.quantities.is_empty() {
            return self.reset_session(message).await;
        }
        let Some(delivery) = draft.delivery_charge else {
            return self.reset_session(message).await;
        };

        let Some(discount) = parse::parse_flat_discount(text) else {
            return self.reply(message.chat_id, replies::INVALID_DISCOUNT).await;
        };

        let totals = match compute_totals(&draft.found_products, &draft.quantities, delivery, discount)
        {
            Ok(totals) => totals,
            Err(e) => {
                warn!("Draft for user {} is inconsistent: {}", message.sender_id, e);
                return self.reset_session(message).await;
            }
        };

        draft.discount_net = Some(discount);
        draft.subtotal = Some(totals.subtotal);
        draft.total = Some(totals.grand_total);
        let summary = replies::summary(&draft.found_products, &totals, false);
        conversation::set_state(
            self.db.pool(),
            message.sender_id,
            Stage::AwaitingConfirmation,
            &draft,
        )
        .await?;
        self.reply(message.chat_id, &summary).await
    }

    async fn handle_confirmation(
        &self,
        message: &InboundMessage,
        mut draft: InvoiceDraft,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        if text.eq_ignore_ascii_case("ok") {
            return self.finalize(message, draft).await;
        }

        if let Some(edit) = parse::parse_price_edit(text) {
            let (Some(delivery), Some(discount)) = (draft.delivery_charge, draft.discount_net)
            else {
                return self.reset_session(message).await;
            };

            if edit.item_number < 1 || edit.item_number > draft.quantities.len() {
                return self
                    .reply(message.chat_id, replies::INVALID_ITEM_NUMBER)
                    .await;
            }

            // The edit rewrites the draft's snapshot price only; the
            // catalog row is never touched.
            let product_index = draft.quantities[edit.item_number - 1].product_index;
            let Some(product) = draft.found_products.get_mut(product_index) else {
                return self.reset_session(message).await;
            };
            product.selling_price = edit.new_price;

            let totals =
                match compute_totals(&draft.found_products, &draft.quantities, delivery, discount) {
                    Ok(totals) => totals,
                    Err(e) => {
                        warn!("Draft for user {} is inconsistent: {}", message.sender_id, e);
                        return self.reset_session(message).await;
                    }
                };

            draft.subtotal = Some(totals.subtotal);
            draft.total = Some(totals.grand_total);
            let summary = replies::summary(&draft.found_products, &totals, true);
            conversation::set_state(
                self.db.pool(),
                message.sender_id,
                Stage::AwaitingConfirmation,
                &draft,
            )
            .await?;
            return self.reply(message.chat_id, &summary).await;
        }

        self.reply(message.chat_id, replies::INVALID_CONFIRMATION)
            .await
    }

    /// Issue the invoice, render the PDF, and deliver it.
    ///
    /// Totals are recomputed from the draft here; the subtotal and total
    /// stored during earlier stages are display copies only. Failure
    /// handling differs by phase: a failed insert keeps the conversation
    /// at confirmation so replying `OK` retries, while a failure after
    /// the insert clears the conversation and tells the operator which
    /// number was already taken by the saved invoice.
    async fn finalize(
        &self,
        message: &InboundMessage,
        draft: InvoiceDraft,
    ) -> Result<(), OrchestratorError> {
        let Some(customer) = draft.customer_info else {
            return self.reset_session(message).await;
        };
        let (Some(delivery), Some(discount)) = (draft.delivery_charge, draft.discount_net) else {
            return self.reset_session(message).await;
        };

        let totals =
            match compute_totals(&draft.found_products, &draft.quantities, delivery, discount) {
                Ok(totals) => totals,
                Err(e) => {
                    warn!("Draft for user {} is inconsistent: {}", message.sender_id, e);
                    return self.reset_session(message).await;
                }
            };
        if totals.lines.is_empty() {
            return self.reset_session(message).await;
        }

        let items: Vec<NewInvoiceItem> = totals
            .lines
            .iter()
            .map(|line| {
                let product = &draft.found_products[line.product_index];
                NewInvoiceItem {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    color: product.color.clone(),
                    warranty: product.warranty.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    discount_percent: line.discount_percent,
                    amount: line.net,
                }
            })
            .collect();

        let now = Utc::now();
        let new_invoice = NewInvoice {
            customer_name: customer.name.clone(),
            customer_address: customer.address.clone(),
            customer_phone: customer.phone.clone(),
            items,
            subtotal: totals.subtotal,
            discount_net: discount,
            delivery_charge: delivery,
            total: totals.grand_total,
        };

        let invoice = match invoice::create_invoice(self.db.pool(), now, &new_invoice).await {
            Ok(invoice) => invoice,
            Err(e) => {
                warn!("Invoice creation failed for user {}: {}", message.sender_id, e);
                // Conversation stays at confirmation; replying OK again
                // draws a fresh number.
                return self.reply(message.chat_id, replies::CREATE_FAILED).await;
            }
        };

        info!(
            "Issued invoice {} for {} ({})",
            invoice.invoice_number, customer.name, invoice.total
        );
        // The row is committed; a lost progress line must not strand the
        // conversation at confirmation, where a retry would draw a
        // second number.
        if let Err(e) = self.reply(message.chat_id, replies::GENERATING).await {
            warn!(
                "Progress reply failed for {}: {}",
                invoice.invoice_number, e
            );
        }

        let date = now.format("%d-%m-%Y").to_string();
        let payload = InvoicePayload {
            invoice_number: invoice.invoice_number.clone(),
            date: date.clone(),
            customer_name: customer.name,
            customer_address: customer.address,
            customer_phone: customer.phone,
            items: totals
                .lines
                .iter()
                .enumerate()
                .map(|(position, line)| PayloadItem {
                    sl_no: (position + 1) as u32,
                    item_name: draft.found_products[line.product_index].name.clone(),
                    quantity: line.quantity,
                    rate: line.unit_price,
                    discount_row: line.discount,
                    amount: line.net,
                })
                .collect(),
            net_total: totals.subtotal,
            discount_net: discount,
            delivery_charge: delivery,
            grand_total: totals.grand_total,
        };

        let pdf = match self.renderer.render(&payload).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("PDF rendering failed for {}: {}", invoice.invoice_number, e);
                return self.give_up_delivery(message, &invoice.invoice_number).await;
            }
        };

        let filename = format!("{}.pdf", invoice.invoice_number);
        let caption = replies::pdf_caption(&invoice.invoice_number, &date, invoice.total);
        match self
            .sender
            .send_document(message.chat_id, &filename, pdf, &caption)
            .await
        {
            Ok(Some(file_id)) => {
                if let Err(e) =
                    invoice::set_pdf_reference(self.db.pool(), invoice.id, &file_id).await
                {
                    warn!(
                        "Failed to record PDF reference for {}: {}",
                        invoice.invoice_number, e
                    );
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "Document delivery failed for {}: {}",
                    invoice.invoice_number, e
                );
                return self.give_up_delivery(message, &invoice.invoice_number).await;
            }
        }

        conversation::clear_state(self.db.pool(), message.sender_id).await?;
        Ok(())
    }

    /// The invoice row is committed but the PDF never reached the chat.
    /// End the conversation; retrying would draw a second number.
    async fn give_up_delivery(
        &self,
        message: &InboundMessage,
        invoice_number: &str,
    ) -> Result<(), OrchestratorError> {
        conversation::clear_state(self.db.pool(), message.sender_id).await?;
        self.reply(message.chat_id, &replies::saved_but_no_pdf(invoice_number))
            .await
    }

    /// The stored draft is missing data its stage requires. Drop it and
    /// ask the operator to start over.
    async fn reset_session(&self, message: &InboundMessage) -> Result<(), OrchestratorError> {
        conversation::clear_state(self.db.pool(), message.sender_id).await?;
        self.reply(message.chat_id, replies::START_OVER).await
    }

    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError> {
        self.sender.send_text(chat_id, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use database::NewProduct;

    const OPERATOR: i64 = 1000;
    const CHAT: i64 = 2000;

    /// Records every outgoing text and document for assertions.
    #[derive(Clone, Default)]
    struct RecordingSender {
        texts: Arc<Mutex<Vec<String>>>,
        documents: Arc<Mutex<Vec<(String, String)>>>,
        file_id: Option<String>,
        /// Texts containing this substring fail to send.
        fail_text_containing: Option<&'static str>,
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send_text(&self, _chat_id: i64, text: &str) -> Result<(), OrchestratorError> {
            if let Some(needle) = self.fail_text_containing {
                if text.contains(needle) {
                    return Err(OrchestratorError::SendFailed("stub".to_string()));
                }
            }
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_typing(&self, _chat_id: i64) -> Result<(), OrchestratorError> {
            Ok(())
        }

        async fn send_document(
            &self,
            _chat_id: i64,
            filename: &str,
            _data: Vec<u8>,
            caption: &str,
        ) -> Result<Option<String>, OrchestratorError> {
            self.documents
                .lock()
                .unwrap()
                .push((filename.to_string(), caption.to_string()));
            Ok(self.file_id.clone())
        }
    }

    struct StubRenderer {
        fail: bool,
    }

    #[async_trait]
    impl DocumentRenderer for StubRenderer {
        async fn render(&self, _payload: &InvoicePayload) -> Result<Vec<u8>, OrchestratorError> {
            if self.fail {
                Err(OrchestratorError::RenderFailed("stub".to_string()))
            } else {
                Ok(b"%PDF-1.4 stub".to_vec())
            }
        }
    }

    async fn test_orchestrator(
        fail_render: bool,
    ) -> (
        Orchestrator<RecordingSender, StubRenderer>,
        RecordingSender,
        Database,
    ) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        seed_catalog(&db).await;

        let sender = RecordingSender {
            file_id: Some("tg-file-1".to_string()),
            ..Default::default()
        };
        let orchestrator = Orchestrator::new(
            db.clone(),
            sender.clone(),
            StubRenderer { fail: fail_render },
            OPERATOR,
        );
        (orchestrator, sender, db)
    }

    async fn seed_catalog(db: &Database) {
        let rows = [
            ("iPhone 15 Pro", "Space Black", "Smartphones", 129900.0),
            ("AirPods Pro (2nd Gen)", "White", "Audio", 24900.0),
        ];
        for (name, color, category, price) in rows {
            product::insert(
                db.pool(),
                &NewProduct {
                    name: name.to_string(),
                    color: color.to_string(),
                    warranty: "1 Year".to_string(),
                    category: category.to_string(),
                    selling_price: price,
                },
            )
            .await
            .unwrap();
        }
    }

    fn msg(text: &str) -> InboundMessage {
        InboundMessage {
            sender_id: OPERATOR,
            chat_id: CHAT,
            text: text.to_string(),
        }
    }

    async fn send(orchestrator: &Orchestrator<RecordingSender, StubRenderer>, text: &str) {
        orchestrator.process(msg(text)).await.unwrap();
    }

    fn last_text(sender: &RecordingSender) -> String {
        sender.texts.lock().unwrap().last().cloned().unwrap()
    }

    /// Walk a conversation up to the confirmation summary.
    async fn advance_to_confirmation(orchestrator: &Orchestrator<RecordingSender, StubRenderer>) {
        send(orchestrator, "/start").await;
        send(orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        send(orchestrator, "iphone, airpods").await;
        send(orchestrator, "1=2, 2=1 D10").await;
        send(orchestrator, "1").await;
        send(orchestrator, "500").await;
    }

    #[tokio::test]
    async fn test_full_flow_issues_invoice_and_delivers_pdf() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/start").await;
        assert!(last_text(&sender).contains("👋 Welcome"));

        send(&orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        assert!(last_text(&sender).contains("✅ Customer details saved!"));
        assert!(last_text(&sender).contains("📞 Phone: 01712345678"));

        send(&orchestrator, "iphone, airpods").await;
        let listing = last_text(&sender);
        assert!(listing.contains("1️⃣ iPhone 15 Pro"));
        assert!(listing.contains("2️⃣ AirPods Pro (2nd Gen)"));

        send(&orchestrator, "1=2, 2=1 D10").await;
        assert!(last_text(&sender).contains("🚚 Delivery charge"));

        send(&orchestrator, "1").await;
        assert!(last_text(&sender).contains("💸 Any discount?"));

        send(&orchestrator, "500").await;
        let summary = last_text(&sender);
        assert!(summary.contains("📋 *Invoice Summary*"));
        // 2 x 129900 + 24900 with 10% off, then delivery 60 and discount 500.
        assert!(summary.contains("💰 Total: ৳2,81,770"));

        send(&orchestrator, "ok").await;

        let number = format!("{}001", Utc::now().format("%Y%m"));
        let documents = sender.documents.lock().unwrap().clone();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].0, format!("{number}.pdf"));
        assert!(documents[0].1.contains(&number));

        let saved = invoice::get_by_number(db.pool(), &number).await.unwrap();
        assert_eq!(saved.total, 281770.0);
        assert_eq!(saved.customer_phone, "01712345678");
        assert_eq!(saved.pdf_file_id.as_deref(), Some("tg-file-1"));

        let items = invoice::get_items(db.pool(), saved.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "iPhone 15 Pro");
        assert_eq!(items[1].discount_percent, 10.0);

        // Conversation is finished.
        assert!(conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_rejects_other_senders_without_touching_state() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        let stranger = InboundMessage {
            sender_id: OPERATOR + 1,
            chat_id: CHAT,
            text: "/start".to_string(),
        };
        orchestrator.process(stranger).await.unwrap();

        assert_eq!(last_text(&sender), replies::UNAUTHORIZED);
        assert!(conversation::get_state(db.pool(), OPERATOR + 1)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_help_replies_without_creating_a_session() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/help").await;
        assert_eq!(last_text(&sender), replies::HELP_TEXT);
        assert!(conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_invalid_customer_input_reprompts_without_advancing() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/start").await;
        send(&orchestrator, "just some words").await;
        assert_eq!(last_text(&sender), replies::INVALID_CUSTOMER_FORMAT);

        // Parses via the period fallback but the phone is too short.
        send(&orchestrator, "Rahim, Dhanmondi. 12345").await;
        assert_eq!(last_text(&sender), replies::INVALID_PHONE);

        let state = conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.stage, Stage::AwaitingCustomerInfo);
    }

    #[tokio::test]
    async fn test_first_message_without_session_is_customer_info() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        assert!(last_text(&sender).contains("✅ Customer details saved!"));

        let state = conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.stage, Stage::AwaitingProducts);
    }

    #[tokio::test]
    async fn test_unknown_product_reprompts() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/start").await;
        send(&orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        send(&orchestrator, "walkman").await;
        assert_eq!(last_text(&sender), replies::NO_PRODUCTS_FOUND);

        let state = conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.stage, Stage::AwaitingProducts);
    }

    #[tokio::test]
    async fn test_quantity_position_out_of_range_reprompts() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/start").await;
        send(&orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        send(&orchestrator, "iphone, airpods").await;
        send(&orchestrator, "5=1").await;

        assert_eq!(
            last_text(&sender),
            "❌ Invalid product number: 5. Please use numbers 1-2."
        );
        let state = conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.stage, Stage::AwaitingQuantity);
    }

    #[tokio::test]
    async fn test_ok_at_quantity_takes_one_of_each() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/start").await;
        send(&orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        send(&orchestrator, "iphone, airpods").await;
        send(&orchestrator, "OK").await;
        assert!(last_text(&sender).contains("🚚 Delivery charge"));

        let state = conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.draft.quantities.len(), 2);
        assert!(state.draft.quantities.iter().all(|q| q.quantity == 1));
    }

    #[tokio::test]
    async fn test_price_edit_updates_summary_but_not_catalog() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/start").await;
        send(&orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        send(&orchestrator, "iphone").await;
        send(&orchestrator, "1=1").await;
        send(&orchestrator, "1").await;
        send(&orchestrator, "0").await;
        assert!(last_text(&sender).contains("💰 Total: ৳1,29,960"));

        send(&orchestrator, "1 120000").await;
        let updated = last_text(&sender);
        assert!(updated.starts_with("✅ Price updated!"));
        assert!(updated.contains("💰 Total: ৳1,20,060"));

        // The catalog row keeps its price.
        let catalog = product::search(db.pool(), "iphone").await.unwrap();
        assert_eq!(catalog[0].selling_price, 129900.0);

        send(&orchestrator, "ok").await;
        let number = format!("{}001", Utc::now().format("%Y%m"));
        let saved = invoice::get_by_number(db.pool(), &number).await.unwrap();
        assert_eq!(saved.total, 120060.0);

        let items = invoice::get_items(db.pool(), saved.id).await.unwrap();
        assert_eq!(items[0].unit_price, 120000.0);
    }

    #[tokio::test]
    async fn test_price_edit_with_bad_item_number_reprompts() {
        let (orchestrator, sender, _db) = test_orchestrator(false).await;

        advance_to_confirmation(&orchestrator).await;
        send(&orchestrator, "9 120000").await;
        assert_eq!(last_text(&sender), replies::INVALID_ITEM_NUMBER);
    }

    #[tokio::test]
    async fn test_unrecognized_confirmation_input_reprompts() {
        let (orchestrator, sender, _db) = test_orchestrator(false).await;

        advance_to_confirmation(&orchestrator).await;
        send(&orchestrator, "looks good!").await;
        assert_eq!(last_text(&sender), replies::INVALID_CONFIRMATION);
    }

    #[tokio::test]
    async fn test_cancel_drops_the_session() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        send(&orchestrator, "/start").await;
        send(&orchestrator, "Rahim, Dhanmondi 27, Dhaka, 01712345678").await;
        send(&orchestrator, "/cancel").await;
        assert_eq!(last_text(&sender), replies::CANCELLED);
        assert!(conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .is_none());

        // The next plain message starts from customer info again.
        send(&orchestrator, "iphone").await;
        assert_eq!(last_text(&sender), replies::INVALID_CUSTOMER_FORMAT);
    }

    #[tokio::test]
    async fn test_draft_missing_stage_data_resets_session() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        // A quantity-stage row with no products behind it.
        conversation::set_state(
            db.pool(),
            OPERATOR,
            Stage::AwaitingQuantity,
            &InvoiceDraft::default(),
        )
        .await
        .unwrap();

        send(&orchestrator, "1=1").await;
        assert_eq!(last_text(&sender), replies::START_OVER);
        assert!(conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_undecodable_state_resets_session() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        sqlx::query("INSERT INTO conversations (user_id, stage, data) VALUES (?, ?, '{}')")
            .bind(OPERATOR)
            .bind("awaiting_pizza")
            .execute(db.pool())
            .await
            .unwrap();

        send(&orchestrator, "hello").await;
        assert_eq!(last_text(&sender), replies::START_OVER);
        assert!(conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_render_failure_keeps_invoice_and_ends_session() {
        let (orchestrator, sender, db) = test_orchestrator(true).await;

        advance_to_confirmation(&orchestrator).await;
        send(&orchestrator, "ok").await;

        let number = format!("{}001", Utc::now().format("%Y%m"));
        assert!(last_text(&sender).contains(&number));
        assert!(last_text(&sender).contains("PDF could not be generated"));
        assert!(sender.documents.lock().unwrap().is_empty());

        // The invoice is committed even though delivery failed.
        let saved = invoice::get_by_number(db.pool(), &number).await.unwrap();
        assert!(saved.pdf_file_id.is_none());
        assert!(conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_lost_progress_reply_does_not_duplicate_the_sale() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        seed_catalog(&db).await;

        // Only the progress line fails; the document still goes out.
        let sender = RecordingSender {
            file_id: Some("tg-file-1".to_string()),
            fail_text_containing: Some("Generating"),
            ..Default::default()
        };
        let orchestrator = Orchestrator::new(
            db.clone(),
            sender.clone(),
            StubRenderer { fail: false },
            OPERATOR,
        );

        advance_to_confirmation(&orchestrator).await;
        send(&orchestrator, "ok").await;

        assert_eq!(invoice::count(db.pool()).await.unwrap(), 1);
        assert_eq!(sender.documents.lock().unwrap().len(), 1);
        assert!(conversation::get_state(db.pool(), OPERATOR)
            .await
            .unwrap()
            .is_none());

        // With the session closed, another OK cannot book the sale again.
        send(&orchestrator, "ok").await;
        assert_eq!(invoice::count(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_number_collision_reprompts_then_heals_on_retry() {
        let (orchestrator, sender, db) = test_orchestrator(false).await;

        // Occupy the first number of the month without bumping the
        // counter, as a partial restore would.
        let year_month = Utc::now().format("%Y%m").to_string();
        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_number, date,
                customer_name, customer_address, customer_phone,
                subtotal, discount_net, delivery_charge, total
            )
            VALUES (?, '2025-01-01 00:00:00', 'Old', 'Somewhere', '01700000000', 1, 0, 0, 1)
            "#,
        )
        .bind(format!("{year_month}001"))
        .execute(db.pool())
        .await
        .unwrap();

        advance_to_confirmation(&orchestrator).await;

        send(&orchestrator, "ok").await;
        assert_eq!(last_text(&sender), replies::CREATE_FAILED);

        // The conversation is still at confirmation, so OK retries and
        // draws the next number.
        send(&orchestrator, "ok").await;
        let saved = invoice::get_by_number(db.pool(), &format!("{year_month}002"))
            .await
            .unwrap();
        assert_eq!(saved.total, 281770.0);
        assert_eq!(sender.documents.lock().unwrap().len(), 1);
    }
}
