//! Admin console.
//!
//! Every endpoint requires the `admin` role and is mounted under `/api/admin`.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/items` | List items with owners |
//! | GET | `/items/{id}` | Get any item |
//! | PATCH | `/items/{id}/status` | Resolve or reopen an item |
//! | PATCH | `/items/{id}/moderate` | Approve or reject an item |
//! | DELETE | `/items/{id}` | Delete an item and its matches |
//! | GET | `/matches` | List matches |
//! | POST | `/matches` | Create a match |
//! | GET | `/matches/{id}` | Get a match |
//! | PATCH | `/matches/{id}/status` | Change match status |
//! | POST | `/matches/{id}/send-email` | Email both owners |
//! | GET | `/users` | List users |
//! | PATCH | `/users/{id}/role` | Change role |
//! | PATCH | `/users/{id}/suspend` | Suspend or reinstate |
//! | DELETE | `/users/{id}` | Delete a user and their data |
//! | GET | `/notifications` | List all notifications |
//! | POST | `/notifications` | Send a notification |
//! | DELETE | `/notifications/{id}` | Delete a notification |
//! | DELETE | `/notifications/bulk` | Delete notifications by id |
//! | DELETE | `/notifications/user/{user_id}` | Clear a user's notifications |
//! | GET | `/settings` | List settings |
//! | PUT | `/settings` | Upsert settings |
//! | GET | `/audit-logs` | Audit trail |
//! | GET | `/stats` | Dashboard counters |
//! | GET | `/analytics/trends` | Item trends |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::AdminServices;
pub use services::AdminService;
