//! Pointer interaction: ray picking, hover hand-off, click selection and
//! the breadcrumb path the host UI renders.

pub mod breadcrumb;
pub mod hover;
pub mod ray;
pub mod select;
