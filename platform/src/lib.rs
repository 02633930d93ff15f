// Host-facing side of the translation layer: the native job descriptor
// model and the converter that produces it from a work specification

pub mod converter;
pub mod descriptor;
pub mod extras;
