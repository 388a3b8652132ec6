// Domain layer: models, option labels and the ports the reconciler drives.

pub mod model;
pub mod option_label;
pub mod ports;
