//! Módulo de comandos do Stencil

pub mod init;
