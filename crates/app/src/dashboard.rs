//! Dashboard data pipeline: fetch statistics and exclusion config, filter,
//! then derive totals and chart series.
//!
//! Filtering runs in a fixed order: account (string-compared against the
//! selector value), cost center, then the exclusion set. Visibility toggles
//! only zero amounts; they never remove rows.

use std::collections::{BTreeMap, HashSet};

use conciliador_client::ClientError;
use conciliador_core::{
    default_exclusions, CentroCostoId, ConceptoId, ConfigFiltroExclusion, CuentaId, DashboardStats, DateRange, Money,
    MovimientoFiltro, TerceroId,
};

use crate::fetch::{Generation, OnError, Remote, Resolution};
use crate::sources::DashboardSource;

pub const SIN_CENTRO_COSTO: &str = "Sin centro de costo";

/// Selector values as chosen in the filter bar. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilters {
    pub cuenta: Option<String>,
    pub centro_costo: Option<String>,
    pub tercero: Option<String>,
    pub concepto: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibilidad {
    pub ingresos: bool,
    pub egresos: bool,
}

impl Default for Visibilidad {
    fn default() -> Self {
        Self {
            ingresos: true,
            egresos: true,
        }
    }
}

impl Visibilidad {
    /// Income and expense of `row` with hidden sides zeroed.
    pub fn mask(self, row: &DashboardStats) -> (Money, Money) {
        let ingresos = if self.ingresos { row.ingresos } else { Money::zero() };
        let egresos = if self.egresos { row.egresos } else { Money::zero() };
        (ingresos, egresos)
    }
}

/// Excluded cost centers and where the selection came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Exclusiones {
    /// Config not loaded yet.
    #[default]
    SinConfigurar,
    /// Seeded from server defaults; reseeded on every config load.
    PorDefecto(HashSet<CentroCostoId>),
    /// Edited by the user; config loads never touch it.
    Manual(HashSet<CentroCostoId>),
}

impl Exclusiones {
    pub fn ids(&self) -> Option<&HashSet<CentroCostoId>> {
        match self {
            Exclusiones::SinConfigurar => None,
            Exclusiones::PorDefecto(ids) | Exclusiones::Manual(ids) => Some(ids),
        }
    }

    pub fn contains(&self, id: CentroCostoId) -> bool {
        self.ids().is_some_and(|ids| ids.contains(&id))
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Exclusiones::Manual(_))
    }

    fn seed(&mut self, config: &[ConfigFiltroExclusion]) {
        if self.is_manual() {
            tracing::debug!("Manual exclusion selection kept over server defaults");
            return;
        }
        *self = Exclusiones::PorDefecto(default_exclusions(config));
    }

    fn toggle(&mut self, id: CentroCostoId) {
        let mut ids = self.ids().cloned().unwrap_or_default();
        if !ids.remove(&id) {
            ids.insert(id);
        }
        *self = Exclusiones::Manual(ids);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totales {
    pub ingresos: Money,
    pub egresos: Money,
    pub saldo: Money,
    pub registros: u64,
}

/// One point of the per-period bar/line chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuntoPeriodo {
    pub periodo: String,
    pub ingresos: Money,
    pub egresos: Money,
    pub saldo: Money,
}

/// One slice of the cost-center breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentoCentroCosto {
    pub centro_costo_id: Option<CentroCostoId>,
    pub nombre: String,
    pub ingresos: Money,
    pub egresos: Money,
}

/// Selector option: value as sent back by the select, label for display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Opcion {
    pub valor: String,
    pub etiqueta: String,
}

pub fn filter_stats<'a>(
    rows: &'a [DashboardStats],
    filters: &DashboardFilters,
    excluded: &Exclusiones,
) -> Vec<&'a DashboardStats> {
    rows.iter()
        .filter(|row| match &filters.cuenta {
            Some(cuenta) => row.cuenta_id.to_string() == *cuenta,
            None => true,
        })
        .filter(|row| match &filters.centro_costo {
            Some(centro) => row.centro_costo_id.is_some_and(|id| id.to_string() == *centro),
            None => true,
        })
        .filter(|row| !row.centro_costo_id.is_some_and(|id| excluded.contains(id)))
        .collect()
}

pub fn compute_totals(rows: &[&DashboardStats], visibilidad: Visibilidad) -> Totales {
    rows.iter().fold(Totales::default(), |mut acc, row| {
        let (ingresos, egresos) = visibilidad.mask(row);
        acc.ingresos += ingresos;
        acc.egresos += egresos;
        acc.saldo += ingresos - egresos;
        acc.registros += row.conteo;
        acc
    })
}

/// Per-period series in ascending period order.
pub fn chart_by_period(rows: &[&DashboardStats], visibilidad: Visibilidad) -> Vec<PuntoPeriodo> {
    let mut by_period: BTreeMap<&str, (Money, Money)> = BTreeMap::new();
    for row in rows {
        let (ingresos, egresos) = visibilidad.mask(row);
        let entry = by_period.entry(row.periodo.as_str()).or_default();
        entry.0 += ingresos;
        entry.1 += egresos;
    }
    by_period
        .into_iter()
        .map(|(periodo, (ingresos, egresos))| PuntoPeriodo {
            periodo: periodo.to_string(),
            ingresos,
            egresos,
            saldo: ingresos - egresos,
        })
        .collect()
}

/// Cost-center breakdown, largest movement (income + expense) first.
pub fn breakdown_by_cost_center(rows: &[&DashboardStats], visibilidad: Visibilidad) -> Vec<SegmentoCentroCosto> {
    let mut by_center: BTreeMap<Option<CentroCostoId>, SegmentoCentroCosto> = BTreeMap::new();
    for row in rows {
        let (ingresos, egresos) = visibilidad.mask(row);
        let segment = by_center
            .entry(row.centro_costo_id)
            .or_insert_with(|| SegmentoCentroCosto {
                centro_costo_id: row.centro_costo_id,
                nombre: row
                    .centro_costo_nombre
                    .clone()
                    .unwrap_or_else(|| SIN_CENTRO_COSTO.to_string()),
                ingresos: Money::zero(),
                egresos: Money::zero(),
            });
        segment.ingresos += ingresos;
        segment.egresos += egresos;
    }
    let mut segments: Vec<_> = by_center.into_values().collect();
    segments.sort_by(|a, b| (b.ingresos + b.egresos).cmp(&(a.ingresos + a.egresos)));
    segments
}

/// Distinct accounts present in the raw stats, sorted by name.
pub fn account_options(rows: &[DashboardStats]) -> Vec<Opcion> {
    let mut seen = BTreeMap::new();
    for row in rows {
        seen.entry(row.cuenta_id)
            .or_insert_with(|| row.cuenta_nombre.clone());
    }
    sorted_options(seen.into_iter().map(|(id, nombre)| (id.to_string(), nombre)))
}

/// Distinct cost centers present in the raw stats, sorted by name.
pub fn cost_center_options(rows: &[DashboardStats]) -> Vec<Opcion> {
    let mut seen = BTreeMap::new();
    for row in rows {
        if let Some(id) = row.centro_costo_id {
            seen.entry(id).or_insert_with(|| {
                row.centro_costo_nombre
                    .clone()
                    .unwrap_or_else(|| format!("Centro {id}"))
            });
        }
    }
    sorted_options(seen.into_iter().map(|(id, nombre)| (id.to_string(), nombre)))
}

fn sorted_options(items: impl Iterator<Item = (String, String)>) -> Vec<Opcion> {
    let mut opts: Vec<Opcion> = items
        .map(|(valor, etiqueta)| Opcion { valor, etiqueta })
        .collect();
    opts.sort_by(|a, b| a.etiqueta.cmp(&b.etiqueta).then_with(|| a.valor.cmp(&b.valor)));
    opts
}

/// Everything the dashboard renders, derived from the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub totales: Totales,
    pub por_periodo: Vec<PuntoPeriodo>,
    pub por_centro_costo: Vec<SegmentoCentroCosto>,
    pub cuentas: Vec<Opcion>,
    pub centros_costos: Vec<Opcion>,
    pub cargando: bool,
}

/// Ticket for one statistics fetch, tied to the range it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsTicket {
    pub generation: Generation,
    pub rango: DateRange,
}

#[derive(Debug)]
pub struct DashboardPage {
    rango: DateRange,
    filters: DashboardFilters,
    visibilidad: Visibilidad,
    exclusiones: Exclusiones,
    stats: Remote<Vec<DashboardStats>>,
    config: Remote<Vec<ConfigFiltroExclusion>>,
}

impl DashboardPage {
    pub fn new(rango: DateRange) -> Self {
        Self {
            rango,
            filters: DashboardFilters::default(),
            visibilidad: Visibilidad::default(),
            exclusiones: Exclusiones::default(),
            stats: Remote::new(),
            config: Remote::new(),
        }
    }

    pub fn rango(&self) -> DateRange {
        self.rango
    }

    pub fn filters(&self) -> &DashboardFilters {
        &self.filters
    }

    pub fn visibilidad(&self) -> Visibilidad {
        self.visibilidad
    }

    pub fn exclusiones(&self) -> &Exclusiones {
        &self.exclusiones
    }

    pub fn stats(&self) -> &Remote<Vec<DashboardStats>> {
        &self.stats
    }

    pub fn exclusion_config(&self) -> &Remote<Vec<ConfigFiltroExclusion>> {
        &self.config
    }

    // ── Inputs ───────────────────────────────────────────────────────────────

    /// Changes the date range. A changed range needs a new fetch, returned as a ticket.
    pub fn set_rango(&mut self, rango: DateRange) -> Option<StatsTicket> {
        if rango == self.rango {
            return None;
        }
        self.rango = rango;
        Some(self.begin_stats())
    }

    pub fn set_cuenta(&mut self, cuenta: Option<String>) {
        self.filters.cuenta = cuenta.filter(|c| !c.is_empty());
    }

    pub fn set_centro_costo(&mut self, centro: Option<String>) {
        self.filters.centro_costo = centro.filter(|c| !c.is_empty());
    }

    pub fn set_tercero(&mut self, tercero: Option<String>) {
        self.filters.tercero = tercero.filter(|t| !t.is_empty());
    }

    pub fn set_concepto(&mut self, concepto: Option<String>) {
        self.filters.concepto = concepto.filter(|c| !c.is_empty());
    }

    pub fn toggle_ingresos(&mut self) {
        self.visibilidad.ingresos = !self.visibilidad.ingresos;
    }

    pub fn toggle_egresos(&mut self) {
        self.visibilidad.egresos = !self.visibilidad.egresos;
    }

    pub fn toggle_exclusion(&mut self, id: CentroCostoId) {
        self.exclusiones.toggle(id);
    }

    pub fn set_exclusiones(&mut self, ids: HashSet<CentroCostoId>) {
        self.exclusiones = Exclusiones::Manual(ids);
    }

    /// Drops the manual selection and goes back to server defaults.
    pub fn restore_default_exclusions(&mut self) {
        self.exclusiones = Exclusiones::SinConfigurar;
        if let Some(config) = self.config.current() {
            self.exclusiones.seed(config);
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────────────

    /// Manual refresh button; also used for the initial load.
    pub fn refresh(&mut self) -> StatsTicket {
        self.begin_stats()
    }

    fn begin_stats(&mut self) -> StatsTicket {
        StatsTicket {
            generation: self.stats.begin(),
            rango: self.rango,
        }
    }

    pub fn complete_stats(
        &mut self,
        ticket: StatsTicket,
        result: Result<Vec<DashboardStats>, ClientError>,
    ) -> Resolution {
        if ticket.rango != self.rango {
            tracing::debug!(rango = %ticket.rango, "Dropping statistics for an old range");
            return Resolution::Superseded;
        }
        if let Err(e) = &result {
            tracing::error!(rango = %ticket.rango, "Error cargando estadisticas: {e}");
        }
        self.stats.resolve(ticket.generation, result, OnError::KeepStale)
    }

    /// Exclusion config is fetched once; `None` when already loaded or loading.
    pub fn begin_config(&mut self) -> Option<Generation> {
        if self.config.is_idle() {
            Some(self.config.begin())
        } else {
            None
        }
    }

    pub fn complete_config(
        &mut self,
        generation: Generation,
        result: Result<Vec<ConfigFiltroExclusion>, ClientError>,
    ) -> Resolution {
        if let Err(e) = &result {
            tracing::error!("Error cargando configuracion de filtros: {e}");
        }
        let resolution = self.config.resolve(generation, result, OnError::KeepStale);
        if resolution == Resolution::Applied {
            if let Some(config) = self.config.loaded() {
                self.exclusiones.seed(config);
            }
        }
        resolution
    }

    /// Forces the exclusion config to be fetched again on the next load.
    pub fn invalidate_config(&mut self) {
        self.config.reset();
    }

    /// Initial load: config (once) and statistics, concurrently.
    pub async fn load<S: DashboardSource + ?Sized>(&mut self, source: &S) {
        let config_gen = self.begin_config();
        let ticket = self.refresh();
        let config_fut = async {
            match config_gen {
                Some(g) => Some((g, source.filtros_exclusion().await)),
                None => None,
            }
        };
        let (config, stats) = tokio::join!(config_fut, source.estadisticas(ticket.rango));
        if let Some((g, result)) = config {
            self.complete_config(g, result);
        }
        self.complete_stats(ticket, stats);
    }

    /// Applies a new range and fetches for it if it changed.
    pub async fn change_range<S: DashboardSource + ?Sized>(&mut self, source: &S, rango: DateRange) {
        if let Some(ticket) = self.set_rango(rango) {
            let result = source.estadisticas(ticket.rango).await;
            self.complete_stats(ticket, result);
        }
    }

    pub async fn reload<S: DashboardSource + ?Sized>(&mut self, source: &S) {
        let ticket = self.refresh();
        let result = source.estadisticas(ticket.rango).await;
        self.complete_stats(ticket, result);
    }

    // ── Derived data ─────────────────────────────────────────────────────────

    pub fn filtered(&self) -> Vec<&DashboardStats> {
        let rows = self.stats.current().map(Vec::as_slice).unwrap_or(&[]);
        filter_stats(rows, &self.filters, &self.exclusiones)
    }

    pub fn totales(&self) -> Totales {
        compute_totals(&self.filtered(), self.visibilidad)
    }

    pub fn view(&self) -> DashboardView {
        let rows = self.stats.current().map(Vec::as_slice).unwrap_or(&[]);
        let filtered = filter_stats(rows, &self.filters, &self.exclusiones);
        DashboardView {
            totales: compute_totals(&filtered, self.visibilidad),
            por_periodo: chart_by_period(&filtered, self.visibilidad),
            por_centro_costo: breakdown_by_cost_center(&filtered, self.visibilidad),
            cuentas: account_options(rows),
            centros_costos: cost_center_options(rows),
            cargando: self.stats.is_loading(),
        }
    }

    /// Movement-list query for drilling down from the current selection.
    /// Selector values that are not numeric ids are ignored.
    pub fn movimiento_filtro(&self) -> MovimientoFiltro {
        MovimientoFiltro {
            rango: Some(self.rango),
            cuenta_id: parse_id(self.filters.cuenta.as_deref(), "cuenta").map(CuentaId),
            tercero_id: parse_id(self.filters.tercero.as_deref(), "tercero").map(TerceroId),
            centro_costo_id: parse_id(self.filters.centro_costo.as_deref(), "centro_costo").map(CentroCostoId),
            concepto_id: parse_id(self.filters.concepto.as_deref(), "concepto").map(ConceptoId),
            ..Default::default()
        }
    }
}

fn parse_id(value: Option<&str>, field: &str) -> Option<i64> {
    let raw = value?;
    match raw.trim().parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::debug!(field, value = raw, "Ignoring non-numeric selector value");
            None
        }
    }
}
