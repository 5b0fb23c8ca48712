pub mod user;
#[cfg(test)]
pub mod class;
pub mod slot;
pub mod reservation;

pub use user::{User, PublicUser, Role};
pub use slot::{SlotSchedule, Availability, BookableSlot, InstructorSlot};
pub use reservation::MemberReservation;

// Raw table rows, only read back directly when checking stored state.
#[cfg(test)]
pub use class::Class;
#[cfg(test)]
pub use slot::Slot;
#[cfg(test)]
pub use reservation::{Reservation, ReservationStatus};
