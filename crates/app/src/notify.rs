use std::collections::VecDeque;

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nivel {
    Exito,
    Error,
    Info,
}

/// Transient notification banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub nivel: Nivel,
    pub mensaje: String,
}

/// Pending toasts, oldest first. Oldest are dropped past the cap.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Toast>,
}

impl Notifications {
    pub fn push(&mut self, nivel: Nivel, mensaje: impl Into<String>) {
        if self.queue.len() == MAX_TOASTS {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            nivel,
            mensaje: mensaje.into(),
        });
    }

    pub fn exito(&mut self, mensaje: impl Into<String>) {
        self.push(Nivel::Exito, mensaje);
    }

    pub fn error(&mut self, mensaje: impl Into<String>) {
        self.push(Nivel::Error, mensaje);
    }

    pub fn info(&mut self, mensaje: impl Into<String>) {
        self.push(Nivel::Info, mensaje);
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Toast> {
        self.queue.drain(..).collect()
    }
}
