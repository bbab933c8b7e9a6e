//! Command handlers behind the CLI. Each drives a view model against a data
//! source and returns a serializable output.

use std::collections::HashSet;
use std::fmt;

use anyhow::{bail, Context, Result};
use conciliador_core::{format_axis_thousands, CentroCostoId, CuentaId, DateRange, Money, Periodo, Semaforo};
use serde::Serialize;

use crate::dashboard::{DashboardPage, PuntoPeriodo, SegmentoCentroCosto};
use crate::notify::Nivel;
use crate::reset::{ReconciliationResetPage, Ribbon};
use crate::sources::{DashboardSource, ReconciliationSource};

#[derive(Debug, Clone, Default)]
pub struct DashboardInput {
    pub rango: Option<DateRange>,
    pub cuenta: Option<String>,
    pub centro_costo: Option<String>,
    pub ocultar_ingresos: bool,
    pub ocultar_egresos: bool,
    /// Replaces the server's default exclusions when set.
    pub excluir: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct DashboardOutput {
    pub desde: String,
    pub hasta: String,
    pub ingresos: Money,
    pub egresos: Money,
    pub saldo: Money,
    pub registros: u64,
    pub por_periodo: Vec<PeriodoOutput>,
    pub por_centro_costo: Vec<CentroCostoOutput>,
}

#[derive(Debug, Serialize)]
pub struct PeriodoOutput {
    pub periodo: String,
    pub ingresos: Money,
    pub egresos: Money,
    pub saldo: Money,
}

impl From<PuntoPeriodo> for PeriodoOutput {
    fn from(p: PuntoPeriodo) -> Self {
        PeriodoOutput {
            periodo: p.periodo,
            ingresos: p.ingresos,
            egresos: p.egresos,
            saldo: p.saldo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CentroCostoOutput {
    pub centro_costo_id: Option<i64>,
    pub nombre: String,
    pub ingresos: Money,
    pub egresos: Money,
}

impl From<SegmentoCentroCosto> for CentroCostoOutput {
    fn from(s: SegmentoCentroCosto) -> Self {
        CentroCostoOutput {
            centro_costo_id: s.centro_costo_id.map(|id| id.0),
            nombre: s.nombre,
            ingresos: s.ingresos,
            egresos: s.egresos,
        }
    }
}

pub async fn dashboard<S: DashboardSource + ?Sized>(
    source: &S,
    input: DashboardInput,
    today: chrono::NaiveDate,
) -> Result<DashboardOutput> {
    let rango = input.rango.unwrap_or_else(|| DateRange::year_to_date(today));
    if !rango.is_valid() {
        bail!("Invalid date range {rango}: start is after end");
    }

    let mut page = DashboardPage::new(rango);
    page.load(source).await;
    if let Some(reason) = page.stats().error() {
        bail!("Could not load dashboard statistics: {reason}");
    }
    if let Some(reason) = page.exclusion_config().error() {
        tracing::warn!("Continuing without exclusion defaults: {reason}");
    }

    page.set_cuenta(input.cuenta);
    page.set_centro_costo(input.centro_costo);
    if input.ocultar_ingresos {
        page.toggle_ingresos();
    }
    if input.ocultar_egresos {
        page.toggle_egresos();
    }
    if let Some(ids) = input.excluir {
        page.set_exclusiones(ids.into_iter().map(CentroCostoId).collect::<HashSet<_>>());
    }

    let view = page.view();
    Ok(DashboardOutput {
        desde: rango.start.to_string(),
        hasta: rango.end.to_string(),
        ingresos: view.totales.ingresos,
        egresos: view.totales.egresos,
        saldo: view.totales.saldo,
        registros: view.totales.registros,
        por_periodo: view.por_periodo.into_iter().map(Into::into).collect(),
        por_centro_costo: view.por_centro_costo.into_iter().map(Into::into).collect(),
    })
}

impl fmt::Display for DashboardOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard {} .. {}", self.desde, self.hasta)?;
        writeln!(f, "  Ingresos:  {:>18}", self.ingresos.format_cop())?;
        writeln!(f, "  Egresos:   {:>18}", self.egresos.format_cop())?;
        writeln!(f, "  Saldo:     {:>18}", self.saldo.format_cop())?;
        writeln!(f, "  Registros: {:>18}", self.registros)?;
        if !self.por_periodo.is_empty() {
            writeln!(f, "\nPor periodo:")?;
            for p in &self.por_periodo {
                writeln!(
                    f,
                    "  {}  {:>12} {:>12} {:>12}",
                    p.periodo,
                    format_axis_thousands(p.ingresos),
                    format_axis_thousands(p.egresos),
                    format_axis_thousands(p.saldo)
                )?;
            }
        }
        if !self.por_centro_costo.is_empty() {
            writeln!(f, "\nPor centro de costo:")?;
            for c in &self.por_centro_costo {
                writeln!(
                    f,
                    "  {:<28} {:>18} {:>18}",
                    c.nombre,
                    c.ingresos.format_cop(),
                    c.egresos.format_cop()
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewOutput {
    pub cuenta_id: i64,
    pub periodo: String,
    pub estado: String,
    pub saldo_extracto: Money,
    pub saldo_sistema: Money,
    pub diferencia: Money,
    pub semaforo: Semaforo,
    pub vinculados: u64,
    pub sin_vincular_extracto: u64,
    pub sin_vincular_sistema: u64,
}

impl PreviewOutput {
    fn new(cuenta: CuentaId, periodo: Periodo, estado: String, ribbon: Ribbon) -> Self {
        PreviewOutput {
            cuenta_id: cuenta.0,
            periodo: periodo.to_string(),
            estado,
            saldo_extracto: ribbon.saldo_extracto,
            saldo_sistema: ribbon.saldo_sistema,
            diferencia: ribbon.diferencia,
            semaforo: ribbon.semaforo,
            vinculados: ribbon.vinculados,
            sin_vincular_extracto: ribbon.sin_vincular_extracto,
            sin_vincular_sistema: ribbon.sin_vincular_sistema,
        }
    }
}

impl fmt::Display for PreviewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cuenta {} / {} [{}] {}", self.cuenta_id, self.periodo, self.estado, self.semaforo)?;
        writeln!(f, "  Saldo extracto: {:>18}", self.saldo_extracto.format_cop())?;
        writeln!(f, "  Saldo sistema:  {:>18}", self.saldo_sistema.format_cop())?;
        writeln!(f, "  Diferencia:     {:>18}", self.diferencia.format_cop())?;
        writeln!(
            f,
            "  Vinculados: {}  Sin vincular extracto: {}  Sin vincular sistema: {}",
            self.vinculados, self.sin_vincular_extracto, self.sin_vincular_sistema
        )
    }
}

async fn load_preview<S: ReconciliationSource + ?Sized>(
    page: &mut ReconciliationResetPage,
    source: &S,
    cuenta: CuentaId,
    periodo: Periodo,
) -> Result<PreviewOutput> {
    page.select_and_load(source, cuenta, periodo).await;
    preview_output(page, cuenta, periodo)
}

fn preview_output(page: &ReconciliationResetPage, cuenta: CuentaId, periodo: Periodo) -> Result<PreviewOutput> {
    if let Some(reason) = page.preview().error() {
        bail!("Could not load reconciliation {cuenta} {periodo}: {reason}");
    }
    let preview = page
        .preview()
        .loaded()
        .with_context(|| format!("No reconciliation preview for {cuenta} {periodo}"))?;
    Ok(PreviewOutput::new(
        cuenta,
        periodo,
        preview.conciliacion.estado.to_string(),
        preview.ribbon(),
    ))
}

pub async fn conciliacion<S: ReconciliationSource + ?Sized>(
    source: &S,
    cuenta: CuentaId,
    periodo: Periodo,
) -> Result<PreviewOutput> {
    let mut page = ReconciliationResetPage::new();
    load_preview(&mut page, source, cuenta, periodo).await
}

#[derive(Debug, Serialize)]
pub struct ResetOutput {
    pub mensaje: String,
    pub antes: PreviewOutput,
    /// `None` when the reload after unlinking failed; the unlink itself stands.
    pub despues: Option<PreviewOutput>,
}

impl fmt::Display for ResetOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.mensaje)?;
        writeln!(f, "\nAntes:")?;
        write!(f, "{}", self.antes)?;
        writeln!(f, "\nDespues:")?;
        match &self.despues {
            Some(despues) => write!(f, "{despues}"),
            None => writeln!(f, "  (no se pudo recargar la conciliacion)"),
        }
    }
}

/// Previews, asks `confirm`, then unlinks every match for the period.
/// Returns `Ok(None)` when the operator declines.
pub async fn reset<S, F>(source: &S, cuenta: CuentaId, periodo: Periodo, confirm: F) -> Result<Option<ResetOutput>>
where
    S: ReconciliationSource + ?Sized,
    F: FnOnce(&PreviewOutput) -> Result<bool>,
{
    let mut page = ReconciliationResetPage::new();
    let antes = load_preview(&mut page, source, cuenta, periodo).await?;

    if !page.request_reset() {
        bail!("Reset is not available for {cuenta} {periodo}");
    }
    if !confirm(&antes)? {
        page.cancel_reset();
        tracing::info!(%cuenta, %periodo, "Reset cancelled");
        return Ok(None);
    }

    let ok = page.confirm_reset(source).await;
    let toast = page
        .notifications_mut()
        .drain()
        .into_iter()
        .last()
        .context("Reset finished without a result message")?;
    if !ok || toast.nivel == Nivel::Error {
        bail!("{}", toast.mensaje);
    }

    let despues = match preview_output(&page, cuenta, periodo) {
        Ok(despues) => Some(despues),
        Err(e) => {
            tracing::warn!(%cuenta, %periodo, "Links removed but the preview could not be reloaded: {e:#}");
            None
        }
    };
    Ok(Some(ResetOutput {
        mensaje: toast.mensaje,
        antes,
        despues,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use conciliador_client::ClientError;
    use conciliador_core::{
        Comparacion, Conciliacion, ConfigFiltroExclusion, DashboardStats, EstadoConciliacion, MensajeResultado,
        ResumenFuente,
    };
    use std::sync::Mutex;

    struct Fake {
        vinculados: Mutex<u64>,
        unlinked: Mutex<u32>,
        comparaciones: Mutex<u32>,
        /// Comparison calls after this many fail.
        comparaciones_ok: u32,
    }

    impl Fake {
        fn new() -> Self {
            Fake {
                vinculados: Mutex::new(8),
                unlinked: Mutex::new(0),
                comparaciones: Mutex::new(0),
                comparaciones_ok: u32::MAX,
            }
        }
    }

    fn stats(centro: i64, ingresos: i64, egresos: i64) -> DashboardStats {
        DashboardStats {
            periodo: "2024-01".into(),
            cuenta_id: CuentaId(1),
            cuenta_nombre: "Bancolombia".into(),
            centro_costo_id: Some(CentroCostoId(centro)),
            centro_costo_nombre: Some(format!("Centro {centro}")),
            conteo: 2,
            ingresos: Money::from_pesos(ingresos),
            egresos: Money::from_pesos(egresos),
        }
    }

    #[async_trait]
    impl DashboardSource for Fake {
        async fn estadisticas(&self, _rango: DateRange) -> Result<Vec<DashboardStats>, ClientError> {
            Ok(vec![stats(10, 100, 40), stats(20, 50, 10)])
        }

        async fn filtros_exclusion(&self) -> Result<Vec<ConfigFiltroExclusion>, ClientError> {
            Ok(vec![ConfigFiltroExclusion {
                id: Some(1),
                centro_costo_id: CentroCostoId(20),
                centro_costo_nombre: None,
                excluido_por_defecto: true,
                activo: true,
            }])
        }
    }

    #[async_trait]
    impl ReconciliationSource for Fake {
        async fn conciliacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Conciliacion, ClientError> {
            Ok(Conciliacion {
                id: None,
                cuenta_id: cuenta,
                year: periodo.year(),
                month: periodo.month(),
                fecha_corte: None,
                saldo_anterior: Money::zero(),
                entradas_extracto: Money::zero(),
                salidas_extracto: Money::zero(),
                saldo_final_extracto: Money::from_pesos(10),
                entradas_sistema: Money::zero(),
                salidas_sistema: Money::zero(),
                saldo_final_sistema: Money::from_pesos(10),
                diferencia: Money::zero(),
                estado: EstadoConciliacion::Conciliado,
                semaforo: Semaforo::Verde,
                datos_extra: None,
            })
        }

        async fn comparacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Comparacion, ClientError> {
            let mut calls = self.comparaciones.lock().unwrap();
            *calls += 1;
            if *calls > self.comparaciones_ok {
                return Err(ClientError::Api {
                    status: 503,
                    detail: "timeout".into(),
                });
            }
            Ok(Comparacion {
                cuenta_id: cuenta,
                year: periodo.year(),
                month: periodo.month(),
                extracto: ResumenFuente::default(),
                sistema: ResumenFuente::default(),
                diferencia: Money::zero(),
                vinculados: *self.vinculados.lock().unwrap(),
                sin_vincular_extracto: 0,
                sin_vincular_sistema: 0,
                semaforo: None,
            })
        }

        async fn desvincular_todo(&self, _cuenta: CuentaId, _periodo: Periodo) -> Result<MensajeResultado, ClientError> {
            *self.unlinked.lock().unwrap() += 1;
            *self.vinculados.lock().unwrap() = 0;
            Ok(MensajeResultado {
                mensaje: "Desvinculados 8 movimientos".into(),
            })
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[tokio::test]
    async fn dashboard_applies_default_exclusions() {
        let out = dashboard(&Fake::new(), DashboardInput::default(), today()).await.unwrap();
        assert_eq!(out.desde, "2024-01-01");
        assert_eq!(out.saldo, Money::from_pesos(60));
        assert_eq!(out.registros, 2);
        assert!(out.to_string().contains("$ 100"));
    }

    #[tokio::test]
    async fn explicit_exclusions_replace_defaults() {
        let input = DashboardInput {
            excluir: Some(vec![]),
            ocultar_egresos: true,
            ..Default::default()
        };
        let out = dashboard(&Fake::new(), input, today()).await.unwrap();
        assert_eq!(out.ingresos, Money::from_pesos(150));
        assert_eq!(out.egresos, Money::zero());
        assert_eq!(out.por_centro_costo.len(), 2);
    }

    #[tokio::test]
    async fn reversed_range_is_rejected() {
        let input = DashboardInput {
            rango: Some(DateRange::new(today(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
            ..Default::default()
        };
        assert!(dashboard(&Fake::new(), input, today()).await.is_err());
    }

    #[tokio::test]
    async fn reset_reports_before_and_after() {
        let fake = Fake::new();
        let periodo = Periodo::new(2024, 3).unwrap();
        let out = reset(&fake, CuentaId(5), periodo, |p| Ok(p.vinculados == 8))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out.mensaje, "Desvinculados 8 movimientos");
        assert_eq!(out.antes.vinculados, 8);
        let despues = out.despues.unwrap();
        assert_eq!(despues.vinculados, 0);
        assert_eq!(despues.semaforo, Semaforo::Verde);
    }

    #[tokio::test]
    async fn reset_succeeds_when_reload_fails() {
        let fake = Fake {
            comparaciones_ok: 1,
            ..Fake::new()
        };
        let periodo = Periodo::new(2024, 3).unwrap();
        let out = reset(&fake, CuentaId(5), periodo, |_| Ok(true)).await.unwrap().unwrap();
        assert_eq!(*fake.unlinked.lock().unwrap(), 1);
        assert_eq!(*fake.comparaciones.lock().unwrap(), 2);
        assert_eq!(out.mensaje, "Desvinculados 8 movimientos");
        assert!(out.despues.is_none());
        assert!(out.to_string().contains("no se pudo recargar"));
    }

    #[tokio::test]
    async fn declined_reset_does_not_unlink() {
        let fake = Fake::new();
        let periodo = Periodo::new(2024, 3).unwrap();
        let out = reset(&fake, CuentaId(5), periodo, |_| Ok(false)).await.unwrap();
        assert!(out.is_none());
        assert_eq!(*fake.unlinked.lock().unwrap(), 0);
    }
}
