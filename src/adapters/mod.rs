// Adapters layer: the WHMCS database and the Pterodactyl panel API.

pub mod mysql;
pub mod pterodactyl;

pub use mysql::{MySqlBillingStore, MySqlBillingTransaction};
pub use pterodactyl::PterodactylClient;
