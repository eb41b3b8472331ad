//! Exchange session state machine.
//!
//! An exchange runs two contracts side by side: the seller's deposit
//! (locking contract) and the buyer's payment (key-exchange contract).
//! Their confirmations arrive independently, so the session tracks each
//! contract on its own and derives the overall [`Phase`] from both.
//!
//! ```text
//!  Created ─LockingFunded─► Locked ─ExchangeFunded─► Offered ─KeyRevealed─► KeyRevealed
//!                             │                        │                        │
//!                             │ DepositUnlocked        │ DepositUnlocked        │ DepositUnlocked
//!                             ▼                        ▼                        ▼
//!                     Settled(BuyerAborted)        Aborting ─ExchangeReclaimed─► Settled(SellerAborted)
//!
//!  Locked | Offered | KeyRevealed ─RefundFunded(i)─► Disputed(i)
//!  Disputed(i) ─RefundClaimed(i)─► Settled(BuyerRefunded(i))
//!  Disputed(i) ─RefundReverted(i)─► Settled(RefundReverted(i))
//! ```

use std::fmt;

use fairex_types::ChunkIndex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codec::DecodeOutcome;
use crate::error::{CoreError, CoreResult};

/// How an exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// Key revealed, payment collected, deposit returned
    Completed,
    /// Seller withdrew the deposit without revealing; buyer reclaimed the payment
    SellerAborted,
    /// Buyer never paid; seller withdrew the deposit
    BuyerAborted,
    /// Buyer proved chunk `i` faulty and took the deposit
    BuyerRefunded(ChunkIndex),
    /// Claim on chunk `i` failed; seller took the deposit back
    RefundReverted(ChunkIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Created,
    Locked,
    Offered,
    KeyRevealed,
    /// Deposit released while the payment is still funded
    Aborting,
    Disputed(ChunkIndex),
    Settled(Settlement),
}

impl Phase {
    pub fn is_settled(&self) -> bool {
        matches!(self, Phase::Settled(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Created => write!(f, "created"),
            Phase::Locked => write!(f, "locked"),
            Phase::Offered => write!(f, "offered"),
            Phase::KeyRevealed => write!(f, "key_revealed"),
            Phase::Aborting => write!(f, "aborting"),
            Phase::Disputed(i) => write!(f, "disputed({})", i),
            Phase::Settled(s) => write!(f, "settled({:?})", s),
        }
    }
}

/// A confirmed on-chain action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "index", rename_all = "snake_case")]
pub enum ExchangeEvent {
    LockingFunded,
    ExchangeFunded,
    KeyRevealed,
    ExchangeReclaimed,
    DepositUnlocked,
    RefundFunded(ChunkIndex),
    RefundClaimed(ChunkIndex),
    RefundReverted(ChunkIndex),
}

impl ExchangeEvent {
    /// The refund event a buyer issues after decoding, if a fault was located.
    pub fn refund_for(outcome: &DecodeOutcome) -> Option<Self> {
        outcome.fault_index().map(ExchangeEvent::RefundFunded)
    }
}

impl fmt::Display for ExchangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeEvent::LockingFunded => write!(f, "locking_funded"),
            ExchangeEvent::ExchangeFunded => write!(f, "exchange_funded"),
            ExchangeEvent::KeyRevealed => write!(f, "key_revealed"),
            ExchangeEvent::ExchangeReclaimed => write!(f, "exchange_reclaimed"),
            ExchangeEvent::DepositUnlocked => write!(f, "deposit_unlocked"),
            ExchangeEvent::RefundFunded(i) => write!(f, "refund_funded({})", i),
            ExchangeEvent::RefundClaimed(i) => write!(f, "refund_claimed({})", i),
            ExchangeEvent::RefundReverted(i) => write!(f, "refund_reverted({})", i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DepositState {
    Unfunded,
    Locked,
    Unlocked,
    Refunding(ChunkIndex),
    Refunded(ChunkIndex),
    Reverted(ChunkIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PaymentState {
    Unfunded,
    Funded,
    Solved,
    Reclaimed,
}

/// One exchange, driven by confirmation events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSession {
    chunk_count: usize,
    deposit: DepositState,
    payment: PaymentState,
    history: Vec<ExchangeEvent>,
}

impl ExchangeSession {
    /// New session over an exchange of `chunk_count` chunks.
    pub fn new(chunk_count: usize) -> Self {
        Self {
            chunk_count,
            deposit: DepositState::Unfunded,
            payment: PaymentState::Unfunded,
            history: Vec::new(),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Events applied so far, in order.
    pub fn history(&self) -> &[ExchangeEvent] {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        use DepositState as D;
        use PaymentState as P;

        match (self.deposit, self.payment) {
            (D::Unfunded, _) => Phase::Created,
            (D::Refunding(i), _) => Phase::Disputed(i),
            (D::Refunded(i), _) => Phase::Settled(Settlement::BuyerRefunded(i)),
            (D::Reverted(i), _) => Phase::Settled(Settlement::RefundReverted(i)),
            (D::Locked, P::Unfunded) => Phase::Locked,
            (D::Locked, P::Funded) => Phase::Offered,
            (D::Locked, P::Solved) => Phase::KeyRevealed,
            // Payment cannot be reclaimed while the deposit is still locked
            (D::Locked, P::Reclaimed) => Phase::Offered,
            (D::Unlocked, P::Unfunded) => Phase::Settled(Settlement::BuyerAborted),
            (D::Unlocked, P::Funded) => Phase::Aborting,
            (D::Unlocked, P::Solved) => Phase::Settled(Settlement::Completed),
            (D::Unlocked, P::Reclaimed) => Phase::Settled(Settlement::SellerAborted),
        }
    }

    /// Apply one confirmed event.
    ///
    /// Fails with `InvalidTransition` if the event cannot happen in the
    /// current state; the session is left unchanged in that case.
    pub fn apply(&mut self, event: ExchangeEvent) -> CoreResult<Phase> {
        use DepositState as D;
        use PaymentState as P;

        let before = self.phase();
        let (deposit, payment) = match (event, self.deposit, self.payment) {
            (ExchangeEvent::LockingFunded, D::Unfunded, p) => (D::Locked, p),
            (ExchangeEvent::ExchangeFunded, D::Locked, P::Unfunded) => (D::Locked, P::Funded),
            (ExchangeEvent::KeyRevealed, d, P::Funded) => (d, P::Solved),
            (ExchangeEvent::ExchangeReclaimed, D::Unlocked, P::Funded) => (D::Unlocked, P::Reclaimed),
            (ExchangeEvent::DepositUnlocked, D::Locked, p) => (D::Unlocked, p),
            (ExchangeEvent::RefundFunded(i), D::Locked, p) if i < self.chunk_count => {
                (D::Refunding(i), p)
            }
            (ExchangeEvent::RefundClaimed(i), D::Refunding(j), p) if i == j => (D::Refunded(i), p),
            (ExchangeEvent::RefundReverted(i), D::Refunding(j), p) if i == j => (D::Reverted(i), p),
            _ => {
                warn!(phase = %before, event = %event, "Rejected exchange event");
                return Err(CoreError::InvalidTransition {
                    phase: before.to_string(),
                    event: event.to_string(),
                });
            }
        };

        self.deposit = deposit;
        self.payment = payment;
        self.history.push(event);

        let after = self.phase();
        info!(event = %event, from = %before, to = %after, "Exchange advanced");
        Ok(after)
    }

    /// Apply events in order, stopping at the first rejected one.
    pub fn apply_all<I>(&mut self, events: I) -> CoreResult<Phase>
    where
        I: IntoIterator<Item = ExchangeEvent>,
    {
        let mut phase = self.phase();
        for event in events {
            phase = self.apply(event)?;
        }
        Ok(phase)
    }
}
