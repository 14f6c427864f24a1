//! Render-context capability and the single-occupancy slot that owns it.

use crate::error::SurfaceError;
use crate::geometry::Geometry;
use crate::sizing::SurfaceSize;

/// A GPU-backed drawing resource: surface, compiled program and geometry.
///
/// Implementations own native resources; `release` consumes the context so it
/// can never be drawn to afterwards.
pub trait RenderContext {
    fn set_size(&mut self, size: SurfaceSize);

    /// Replace vertex/index buffers without recompiling the program.
    fn rebuild_geometry(&mut self, geometry: &Geometry) -> Result<(), SurfaceError>;

    /// Upload `uniforms` and draw one frame.
    fn draw(&mut self, uniforms: &[u8]) -> Result<(), SurfaceError>;

    /// Free native resources and detach the canvas.
    fn release(self);
}

/// Generation handle for one acquisition attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
enum SlotState<C> {
    Empty,
    Acquiring(Ticket),
    Active(Ticket, C),
    Closed,
}

/// Holds at most one context. Releasing or closing invalidates the current
/// ticket, so a late acquisition cannot install a second context.
#[derive(Debug)]
pub struct ContextSlot<C> {
    state: SlotState<C>,
    generation: u64,
}

impl<C> Default for ContextSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ContextSlot<C> {
    pub fn new() -> Self {
        Self {
            state: SlotState::Empty,
            generation: 0,
        }
    }

    /// Empty → Acquiring. `None` while acquiring, active or closed.
    pub fn begin(&mut self) -> Option<Ticket> {
        match self.state {
            SlotState::Empty => {
                self.generation += 1;
                let ticket = Ticket(self.generation);
                self.state = SlotState::Acquiring(ticket);
                Some(ticket)
            }
            _ => None,
        }
    }

    /// Acquiring(ticket) → Active. A stale ticket hands the context back for release.
    pub fn complete(&mut self, ticket: Ticket, ctx: C) -> Result<(), C> {
        match self.state {
            SlotState::Acquiring(current) if current == ticket => {
                self.state = SlotState::Active(ticket, ctx);
                Ok(())
            }
            _ => Err(ctx),
        }
    }

    /// Acquiring(ticket) → Empty after a failed acquisition. False for stale tickets.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        match self.state {
            SlotState::Acquiring(current) if current == ticket => {
                self.state = SlotState::Empty;
                true
            }
            _ => false,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut C> {
        match &mut self.state {
            SlotState::Active(_, ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Active/Acquiring → Empty, returning the context if there was one.
    pub fn take(&mut self) -> Option<C> {
        match std::mem::replace(&mut self.state, SlotState::Empty) {
            SlotState::Active(_, ctx) => Some(ctx),
            SlotState::Closed => {
                self.state = SlotState::Closed;
                None
            }
            _ => None,
        }
    }

    /// Terminal state; returns the active context, if any, for release.
    pub fn close(&mut self) -> Option<C> {
        match std::mem::replace(&mut self.state, SlotState::Closed) {
            SlotState::Active(_, ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SlotState::Active(..))
    }

    pub fn is_acquiring(&self) -> bool {
        matches!(self.state, SlotState::Acquiring(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, SlotState::Closed)
    }

    pub fn ticket(&self) -> Option<Ticket> {
        match self.state {
            SlotState::Acquiring(t) | SlotState::Active(t, _) => Some(t),
            _ => None,
        }
    }
}
