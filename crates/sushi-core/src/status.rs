//! # Statuses and Payment Channels
//!
//! Text-backed enums shared by the kitchen queue and the payment flow.
//!
//! ## Kitchen Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  confirm_order ──► preparing ──┬──► "done"      → Complete              │
//! │                       │        │     ticket deleted, history kept       │
//! │                       │        │                                        │
//! │                       │        ├──► "cancelled" → Cancel                │
//! │                       │        │     ticket and history deleted         │
//! │                       │        │                                        │
//! │                       └────────┴──► anything else → Advance             │
//! │                                      ticket and history relabelled      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Kitchen staff may type any label ("grilling", "plating"), so
//! `TicketStatus` keeps free text in `Other` instead of rejecting it.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Ticket Status
// =============================================================================

/// Status of a kitchen ticket and of the history line mirroring it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TicketStatus {
    /// Confirmed and waiting for (or being worked on by) the kitchen.
    Preparing,
    /// Served; the ticket leaves the queue, the history line stays.
    Done,
    /// Withdrawn; the ticket and its history lines are deleted.
    Cancelled,
    /// Any other kitchen label, stored verbatim (trimmed).
    Other(String),
}

impl TicketStatus {
    /// Stored/serialized text form.
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Preparing => "preparing",
            TicketStatus::Done => "done",
            TicketStatus::Cancelled => "cancelled",
            TicketStatus::Other(label) => label,
        }
    }

    /// What applying this status does to a queued ticket.
    pub fn action(&self) -> StatusAction {
        match self {
            TicketStatus::Cancelled => StatusAction::Cancel,
            TicketStatus::Done => StatusAction::Complete,
            TicketStatus::Preparing | TicketStatus::Other(_) => StatusAction::Advance,
        }
    }

    /// Whether this status removes the ticket from the live queue.
    #[inline]
    pub fn is_final(&self) -> bool {
        !matches!(self.action(), StatusAction::Advance)
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Preparing
    }
}

impl From<&str> for TicketStatus {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "preparing" => TicketStatus::Preparing,
            "done" => TicketStatus::Done,
            "cancelled" | "canceled" => TicketStatus::Cancelled,
            _ => TicketStatus::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for TicketStatus {
    fn from(raw: String) -> Self {
        TicketStatus::from(raw.as_str())
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TicketStatus::from(s))
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Status Action
// =============================================================================

/// The three ways a status update can touch the queue and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    /// Delete the ticket and every history line for the same table and item.
    Cancel,
    /// Mark the history line done, then delete the ticket.
    Complete,
    /// Relabel both the ticket and the history line; the ticket stays queued.
    Advance,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment channel chosen by the guest or used by the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PaymentMethod {
    /// Paid at the counter in cash.
    Cash,
    /// Guest scans a QR code and pays from the table.
    QrCode,
    /// Card on the staff terminal.
    Card,
    /// Any other channel, stored verbatim (trimmed).
    Other(String),
}

impl PaymentMethod {
    /// Stored/serialized text form.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::QrCode => "qr_code",
            PaymentMethod::Card => "card",
            PaymentMethod::Other(label) => label,
        }
    }

    /// Self-service channels settle straight from the table without staff.
    #[inline]
    pub fn is_self_service(&self) -> bool {
        matches!(self, PaymentMethod::QrCode)
    }
}

impl From<&str> for PaymentMethod {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "cash" => PaymentMethod::Cash,
            "qrcode" | "qr" | "promptpay" => PaymentMethod::QrCode,
            "card" | "creditcard" => PaymentMethod::Card,
            _ => PaymentMethod::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        PaymentMethod::from(raw.as_str())
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PaymentMethod::from(s))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Selected Method
// =============================================================================

/// Result of looking up a seating's pending payment choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SelectedMethod {
    Chosen(PaymentMethod),
    /// No selection recorded since the last settlement.
    Unselected,
}

impl SelectedMethod {
    /// Text used for the unselected sentinel.
    pub const UNSELECTED: &'static str = "unselected";

    /// The chosen method, if any.
    pub fn method(&self) -> Option<&PaymentMethod> {
        match self {
            SelectedMethod::Chosen(method) => Some(method),
            SelectedMethod::Unselected => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SelectedMethod::Chosen(method) => method.as_str(),
            SelectedMethod::Unselected => Self::UNSELECTED,
        }
    }
}

impl From<Option<PaymentMethod>> for SelectedMethod {
    fn from(method: Option<PaymentMethod>) -> Self {
        method.map_or(SelectedMethod::Unselected, SelectedMethod::Chosen)
    }
}

impl From<String> for SelectedMethod {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case(Self::UNSELECTED) || raw.trim().is_empty() {
            SelectedMethod::Unselected
        } else {
            SelectedMethod::Chosen(PaymentMethod::from(raw))
        }
    }
}

impl From<SelectedMethod> for String {
    fn from(selected: SelectedMethod) -> Self {
        match selected {
            SelectedMethod::Chosen(method) => method.into(),
            SelectedMethod::Unselected => SelectedMethod::UNSELECTED.to_string(),
        }
    }
}

impl fmt::Display for SelectedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_status_parsing() {
        assert_eq!(TicketStatus::from("done"), TicketStatus::Done);
        assert_eq!(TicketStatus::from("  DONE "), TicketStatus::Done);
        assert_eq!(TicketStatus::from("Cancelled"), TicketStatus::Cancelled);
        assert_eq!(TicketStatus::from("preparing"), TicketStatus::Preparing);
        assert_eq!(
            TicketStatus::from(" Grilling "),
            TicketStatus::Other("Grilling".to_string())
        );
    }

    #[test]
    fn test_ticket_status_actions() {
        assert_eq!(TicketStatus::Cancelled.action(), StatusAction::Cancel);
        assert_eq!(TicketStatus::Done.action(), StatusAction::Complete);
        assert_eq!(TicketStatus::Preparing.action(), StatusAction::Advance);
        assert_eq!(
            TicketStatus::Other("plating".into()).action(),
            StatusAction::Advance
        );
        assert!(TicketStatus::Done.is_final());
        assert!(!TicketStatus::Other("plating".into()).is_final());
    }

    #[test]
    fn test_ticket_status_serializes_as_text() {
        let json = serde_json::to_string(&TicketStatus::Done).unwrap();
        assert_eq!(json, "\"done\"");

        let parsed: TicketStatus = serde_json::from_str("\"plating\"").unwrap();
        assert_eq!(parsed, TicketStatus::Other("plating".to_string()));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(PaymentMethod::from("cash"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::from("QR Code"), PaymentMethod::QrCode);
        assert_eq!(PaymentMethod::from("qr_code"), PaymentMethod::QrCode);
        assert_eq!(PaymentMethod::from("Credit Card"), PaymentMethod::Card);
        assert_eq!(
            PaymentMethod::from("voucher"),
            PaymentMethod::Other("voucher".to_string())
        );
        assert!(PaymentMethod::QrCode.is_self_service());
        assert!(!PaymentMethod::Cash.is_self_service());
    }

    #[test]
    fn test_selected_method_sentinel() {
        let none: SelectedMethod = None.into();
        assert_eq!(none, SelectedMethod::Unselected);
        assert_eq!(none.to_string(), "unselected");
        assert_eq!(none.method(), None);

        let chosen: SelectedMethod = Some(PaymentMethod::Card).into();
        assert_eq!(chosen.to_string(), "card");
        assert_eq!(chosen.method(), Some(&PaymentMethod::Card));

        let json = serde_json::to_string(&SelectedMethod::Unselected).unwrap();
        assert_eq!(json, "\"unselected\"");
    }
}
