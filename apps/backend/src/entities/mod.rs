pub mod categories;
pub mod event_registrations;
pub mod events;
pub mod roles;
pub mod rsvps;
pub mod user_roles;
pub mod users;

pub use categories::Entity as Categories;
pub use categories::Model as Category;
pub use event_registrations::Entity as EventRegistrations;
pub use event_registrations::Model as EventRegistration;
pub use events::Entity as Events;
pub use events::Model as Event;
pub use roles::Entity as Roles;
pub use roles::Model as RoleRow;
pub use rsvps::Entity as Rsvps;
pub use rsvps::Model as Rsvp;
pub use user_roles::Entity as UserRoles;
pub use user_roles::Model as UserRole;
pub use users::Entity as Users;
pub use users::Model as User;
