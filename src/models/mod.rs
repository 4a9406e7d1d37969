// Data models for the relay's API and the Zoom API

pub mod zoom;
