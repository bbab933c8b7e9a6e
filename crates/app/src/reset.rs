//! Reconciliation reset workflow: pick an account and period, preview its
//! reconciliation numbers, then unlink every match for that period.

use conciliador_client::ClientError;
use conciliador_core::{Comparacion, Conciliacion, CuentaId, MensajeResultado, Money, Periodo, Semaforo};

use crate::fetch::{Generation, LoadState, OnError, Remote, Resolution};
use crate::notify::Notifications;
use crate::sources::ReconciliationSource;

/// Reconciliation record and comparison report, fetched as a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub conciliacion: Conciliacion,
    pub comparacion: Comparacion,
}

/// Numbers shown in the summary ribbon above the reset button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ribbon {
    pub saldo_extracto: Money,
    pub saldo_sistema: Money,
    pub diferencia: Money,
    pub semaforo: Semaforo,
    pub vinculados: u64,
    pub sin_vincular_extracto: u64,
    pub sin_vincular_sistema: u64,
}

impl Preview {
    pub fn ribbon(&self) -> Ribbon {
        let c = &self.conciliacion;
        let cmp = &self.comparacion;
        Ribbon {
            saldo_extracto: c.saldo_final_extracto,
            saldo_sistema: c.saldo_final_sistema,
            diferencia: c.diferencia,
            // the comparison report is the fresher source when it carries one
            semaforo: cmp.semaforo.unwrap_or(c.semaforo),
            vinculados: cmp.vinculados,
            sin_vincular_extracto: cmp.sin_vincular_extracto,
            sin_vincular_sistema: cmp.sin_vincular_sistema,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetDialog {
    #[default]
    Closed,
    Confirming,
    Resetting,
}

/// Ticket for one preview fetch, keyed to the selection it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    pub generation: Generation,
    pub cuenta: CuentaId,
    pub periodo: Periodo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTicket {
    pub cuenta: CuentaId,
    pub periodo: Periodo,
}

#[derive(Debug, Default)]
pub struct ReconciliationResetPage {
    seleccion: Option<(CuentaId, Periodo)>,
    preview: Remote<Preview>,
    dialog: ResetDialog,
    en_curso: Option<ResetTicket>,
    notifications: Notifications,
}

impl ReconciliationResetPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seleccion(&self) -> Option<(CuentaId, Periodo)> {
        self.seleccion
    }

    pub fn preview(&self) -> &Remote<Preview> {
        &self.preview
    }

    pub fn ribbon(&self) -> Option<Ribbon> {
        self.preview.loaded().map(Preview::ribbon)
    }

    pub fn dialog(&self) -> ResetDialog {
        self.dialog
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn is_resetting(&self) -> bool {
        self.en_curso.is_some()
    }

    /// Selects an account and period. Returns a ticket for the preview load,
    /// or `None` when the selection did not change or a reset is running.
    pub fn select(&mut self, cuenta: CuentaId, periodo: Periodo) -> Option<PreviewTicket> {
        if self.seleccion == Some((cuenta, periodo)) {
            return None;
        }
        if let Some(ticket) = self.en_curso {
            tracing::debug!(cuenta = %ticket.cuenta, periodo = %ticket.periodo, "Selection locked while reset runs");
            return None;
        }
        self.seleccion = Some((cuenta, periodo));
        self.dialog = ResetDialog::Closed;
        self.preview.reset();
        Some(self.begin_preview(cuenta, periodo))
    }

    /// Reloads the preview for the current selection.
    pub fn refresh_preview(&mut self) -> Option<PreviewTicket> {
        if self.en_curso.is_some() {
            return None;
        }
        let (cuenta, periodo) = self.seleccion?;
        Some(self.begin_preview(cuenta, periodo))
    }

    fn begin_preview(&mut self, cuenta: CuentaId, periodo: Periodo) -> PreviewTicket {
        PreviewTicket {
            generation: self.preview.begin(),
            cuenta,
            periodo,
        }
    }

    pub fn complete_preview(
        &mut self,
        ticket: PreviewTicket,
        result: Result<Preview, ClientError>,
    ) -> Resolution {
        if self.seleccion != Some((ticket.cuenta, ticket.periodo)) {
            tracing::debug!(cuenta = %ticket.cuenta, periodo = %ticket.periodo, "Dropping preview for an old selection");
            return Resolution::Superseded;
        }
        if let Err(e) = &result {
            tracing::error!(cuenta = %ticket.cuenta, periodo = %ticket.periodo, "Error cargando estadisticas: {e}");
        }
        self.preview.resolve(ticket.generation, result, OnError::Discard)
    }

    pub fn can_request_reset(&self) -> bool {
        self.seleccion.is_some() && !self.preview.is_loading() && self.en_curso.is_none()
    }

    /// Opens the confirmation dialog. Returns whether it opened.
    pub fn request_reset(&mut self) -> bool {
        if !self.can_request_reset() {
            return false;
        }
        self.dialog = ResetDialog::Confirming;
        true
    }

    pub fn cancel_reset(&mut self) {
        if self.dialog == ResetDialog::Confirming {
            self.dialog = ResetDialog::Closed;
            self.notifications.info("Reinicio cancelado");
        }
    }

    /// Confirms the dialog. Only one reset runs at a time.
    pub fn begin_reset(&mut self) -> Option<ResetTicket> {
        if self.dialog != ResetDialog::Confirming || self.en_curso.is_some() {
            return None;
        }
        let (cuenta, periodo) = self.seleccion?;
        let ticket = ResetTicket { cuenta, periodo };
        self.dialog = ResetDialog::Resetting;
        self.en_curso = Some(ticket);
        Some(ticket)
    }

    /// Applies the unlink result. On success the preview must be re-fetched
    /// with the returned ticket.
    pub fn complete_reset(
        &mut self,
        ticket: ResetTicket,
        result: Result<MensajeResultado, ClientError>,
    ) -> Option<PreviewTicket> {
        if self.en_curso != Some(ticket) {
            tracing::warn!(cuenta = %ticket.cuenta, periodo = %ticket.periodo, "Ignoring result of a reset that is not in flight");
            return None;
        }
        self.en_curso = None;
        match result {
            Ok(res) => {
                tracing::info!(cuenta = %ticket.cuenta, periodo = %ticket.periodo, "Vinculaciones eliminadas: {}", res.mensaje);
                self.dialog = ResetDialog::Closed;
                self.notifications.exito(res.mensaje);
                self.refresh_preview()
            }
            Err(e) => {
                tracing::error!(cuenta = %ticket.cuenta, periodo = %ticket.periodo, "Error al desvincular: {e}");
                self.dialog = ResetDialog::Confirming;
                self.notifications.error(format!("Error al desvincular: {e}"));
                None
            }
        }
    }

    pub async fn load_preview<S: ReconciliationSource + ?Sized>(&mut self, source: &S, ticket: PreviewTicket) {
        let result = fetch_preview(source, ticket.cuenta, ticket.periodo).await;
        self.complete_preview(ticket, result);
    }

    /// Select and load in one step.
    pub async fn select_and_load<S: ReconciliationSource + ?Sized>(
        &mut self,
        source: &S,
        cuenta: CuentaId,
        periodo: Periodo,
    ) {
        if let Some(ticket) = self.select(cuenta, periodo) {
            self.load_preview(source, ticket).await;
        }
    }

    /// Runs the confirmed reset and the follow-up preview reload.
    pub async fn confirm_reset<S: ReconciliationSource + ?Sized>(&mut self, source: &S) -> bool {
        let Some(ticket) = self.begin_reset() else {
            return false;
        };
        let result = source.desvincular_todo(ticket.cuenta, ticket.periodo).await;
        let ok = result.is_ok();
        if let Some(preview) = self.complete_reset(ticket, result) {
            self.load_preview(source, preview).await;
        }
        ok
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.preview.state(), LoadState::Failed { .. })
    }
}

async fn fetch_preview<S: ReconciliationSource + ?Sized>(
    source: &S,
    cuenta: CuentaId,
    periodo: Periodo,
) -> Result<Preview, ClientError> {
    let (conciliacion, comparacion) =
        tokio::try_join!(source.conciliacion(cuenta, periodo), source.comparacion(cuenta, periodo))?;
    Ok(Preview {
        conciliacion,
        comparacion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Nivel;
    use async_trait::async_trait;
    use conciliador_core::{EstadoConciliacion, ResumenFuente};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        fail_comparacion: bool,
        fail_unlink: bool,
        conciliacion_calls: Mutex<u32>,
        comparacion_calls: Mutex<u32>,
        unlink_calls: Mutex<Vec<(CuentaId, i32, u32)>>,
    }

    fn conciliacion(cuenta: CuentaId, periodo: Periodo) -> Conciliacion {
        Conciliacion {
            id: Some(1),
            cuenta_id: cuenta,
            year: periodo.year(),
            month: periodo.month(),
            fecha_corte: None,
            saldo_anterior: Money::from_pesos(1_000),
            entradas_extracto: Money::from_pesos(500),
            salidas_extracto: Money::from_pesos(200),
            saldo_final_extracto: Money::from_pesos(1_300),
            entradas_sistema: Money::from_pesos(450),
            salidas_sistema: Money::from_pesos(200),
            saldo_final_sistema: Money::from_pesos(1_250),
            diferencia: Money::from_pesos(50),
            estado: EstadoConciliacion::ConDiferencias,
            semaforo: Semaforo::Amarillo,
            datos_extra: None,
        }
    }

    fn comparacion(cuenta: CuentaId, periodo: Periodo) -> Comparacion {
        Comparacion {
            cuenta_id: cuenta,
            year: periodo.year(),
            month: periodo.month(),
            extracto: ResumenFuente::default(),
            sistema: ResumenFuente::default(),
            diferencia: Money::from_pesos(50),
            vinculados: 12,
            sin_vincular_extracto: 3,
            sin_vincular_sistema: 1,
            semaforo: Some(Semaforo::Rojo),
        }
    }

    fn api_error() -> ClientError {
        ClientError::Api {
            status: 500,
            detail: "fallo".into(),
        }
    }

    #[async_trait]
    impl ReconciliationSource for FakeSource {
        async fn conciliacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Conciliacion, ClientError> {
            *self.conciliacion_calls.lock().unwrap() += 1;
            Ok(conciliacion(cuenta, periodo))
        }

        async fn comparacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Comparacion, ClientError> {
            *self.comparacion_calls.lock().unwrap() += 1;
            if self.fail_comparacion {
                return Err(api_error());
            }
            Ok(comparacion(cuenta, periodo))
        }

        async fn desvincular_todo(&self, cuenta: CuentaId, periodo: Periodo) -> Result<MensajeResultado, ClientError> {
            self.unlink_calls
                .lock()
                .unwrap()
                .push((cuenta, periodo.year(), periodo.month()));
            if self.fail_unlink {
                return Err(api_error());
            }
            Ok(MensajeResultado {
                mensaje: "15 vinculaciones eliminadas".into(),
            })
        }
    }

    fn marzo() -> Periodo {
        Periodo::new(2024, 3).unwrap()
    }

    #[tokio::test]
    async fn preview_loads_ribbon() {
        let source = FakeSource::default();
        let mut page = ReconciliationResetPage::new();
        page.select_and_load(&source, CuentaId(5), marzo()).await;

        let ribbon = page.ribbon().unwrap();
        assert_eq!(ribbon.saldo_extracto, Money::from_pesos(1_300));
        assert_eq!(ribbon.saldo_sistema, Money::from_pesos(1_250));
        assert_eq!(ribbon.semaforo, Semaforo::Rojo);
        assert_eq!(ribbon.vinculados, 12);
        assert!(page.can_request_reset());
    }

    #[tokio::test]
    async fn reset_unlinks_once_then_refetches_once() {
        let source = FakeSource::default();
        let mut page = ReconciliationResetPage::new();
        page.select_and_load(&source, CuentaId(5), marzo()).await;
        assert_eq!(*source.comparacion_calls.lock().unwrap(), 1);

        assert!(page.request_reset());
        assert_eq!(page.dialog(), ResetDialog::Confirming);
        assert!(page.confirm_reset(&source).await);

        assert_eq!(*source.unlink_calls.lock().unwrap(), vec![(CuentaId(5), 2024, 3)]);
        assert_eq!(*source.comparacion_calls.lock().unwrap(), 2);
        assert_eq!(page.dialog(), ResetDialog::Closed);
        let toast = page.notifications().latest().unwrap();
        assert_eq!(toast.nivel, Nivel::Exito);
        assert_eq!(toast.mensaje, "15 vinculaciones eliminadas");
        assert!(page.ribbon().is_some());
    }

    #[tokio::test]
    async fn comparison_failure_leaves_no_partial_preview() {
        let source = FakeSource {
            fail_comparacion: true,
            ..Default::default()
        };
        let mut page = ReconciliationResetPage::new();
        page.select_and_load(&source, CuentaId(5), marzo()).await;

        assert!(page.is_failed());
        assert!(page.preview().current().is_none());
        assert!(page.ribbon().is_none());
        assert!(!page.preview().is_loading());
    }

    #[tokio::test]
    async fn failed_reset_keeps_dialog_open() {
        let source = FakeSource {
            fail_unlink: true,
            ..Default::default()
        };
        let mut page = ReconciliationResetPage::new();
        page.select_and_load(&source, CuentaId(5), marzo()).await;
        page.request_reset();

        assert!(!page.confirm_reset(&source).await);
        assert_eq!(page.dialog(), ResetDialog::Confirming);
        assert_eq!(page.notifications().latest().unwrap().nivel, Nivel::Error);
        assert_eq!(*source.comparacion_calls.lock().unwrap(), 1);
        assert!(page.can_request_reset());
    }

    #[test]
    fn reset_needs_selection_and_idle_preview() {
        let mut page = ReconciliationResetPage::new();
        assert!(!page.can_request_reset());
        assert!(!page.request_reset());

        page.select(CuentaId(5), marzo()).unwrap();
        assert!(!page.can_request_reset());
    }

    #[test]
    fn second_confirm_while_resetting_is_ignored() {
        let mut page = ReconciliationResetPage::new();
        let t = page.select(CuentaId(5), marzo()).unwrap();
        page.complete_preview(
            t,
            Ok(Preview {
                conciliacion: conciliacion(CuentaId(5), marzo()),
                comparacion: comparacion(CuentaId(5), marzo()),
            }),
        );
        page.request_reset();
        assert!(page.begin_reset().is_some());
        assert!(page.begin_reset().is_none());
        assert!(!page.can_request_reset());
        assert!(!page.request_reset());
    }

    #[test]
    fn selection_is_locked_while_reset_runs() {
        let mut page = ReconciliationResetPage::new();
        let t = page.select(CuentaId(5), marzo()).unwrap();
        page.complete_preview(
            t,
            Ok(Preview {
                conciliacion: conciliacion(CuentaId(5), marzo()),
                comparacion: comparacion(CuentaId(5), marzo()),
            }),
        );
        page.request_reset();
        let marzo_reset = page.begin_reset().unwrap();

        let abril = Periodo::new(2024, 4).unwrap();
        assert!(page.select(CuentaId(5), abril).is_none());
        assert!(page.refresh_preview().is_none());
        assert_eq!(page.seleccion(), Some((CuentaId(5), marzo())));
        assert_eq!(page.dialog(), ResetDialog::Resetting);
        assert!(!page.request_reset());
        assert!(page.begin_reset().is_none());

        page.complete_reset(marzo_reset, Err(api_error()));
        assert!(!page.is_resetting());
        assert_eq!(page.dialog(), ResetDialog::Confirming);
        assert_eq!(page.notifications().latest().unwrap().nivel, Nivel::Error);
        assert!(page.select(CuentaId(5), abril).is_some());
    }

    #[test]
    fn result_for_reset_not_in_flight_is_ignored() {
        let mut page = ReconciliationResetPage::new();
        let t = page.select(CuentaId(5), marzo()).unwrap();
        page.complete_preview(t, Err(api_error()));
        page.request_reset();
        let current = page.begin_reset().unwrap();

        let other = ResetTicket {
            cuenta: CuentaId(9),
            periodo: marzo(),
        };
        let ok = MensajeResultado {
            mensaje: "otra".into(),
        };
        assert!(page.complete_reset(other, Ok(ok)).is_none());
        assert!(page.is_resetting());
        assert!(page.notifications().is_empty());

        let done = MensajeResultado {
            mensaje: "listo".into(),
        };
        assert!(page.complete_reset(current, Ok(done)).is_some());
        assert_eq!(page.dialog(), ResetDialog::Closed);
    }

    #[test]
    fn cancel_closes_dialog() {
        let mut page = ReconciliationResetPage::new();
        let t = page.select(CuentaId(5), marzo()).unwrap();
        page.complete_preview(t, Err(api_error()));
        assert!(page.request_reset());
        page.cancel_reset();
        assert_eq!(page.dialog(), ResetDialog::Closed);
        assert_eq!(page.notifications().latest().unwrap().nivel, Nivel::Info);
    }

    #[test]
    fn preview_for_previous_selection_is_dropped() {
        let mut page = ReconciliationResetPage::new();
        let old = page.select(CuentaId(5), marzo()).unwrap();
        let abril = Periodo::new(2024, 4).unwrap();
        let new = page.select(CuentaId(5), abril).unwrap();

        let stale = Preview {
            conciliacion: conciliacion(CuentaId(5), marzo()),
            comparacion: comparacion(CuentaId(5), marzo()),
        };
        assert_eq!(page.complete_preview(old, Ok(stale)), Resolution::Superseded);
        assert!(page.preview().is_loading());
        assert_eq!(page.complete_preview(new, Err(api_error())), Resolution::Applied);
    }

    #[test]
    fn reselecting_same_period_does_not_refetch() {
        let mut page = ReconciliationResetPage::new();
        assert!(page.select(CuentaId(5), marzo()).is_some());
        assert!(page.select(CuentaId(5), marzo()).is_none());
    }
}
