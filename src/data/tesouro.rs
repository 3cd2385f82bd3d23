//! Tesouro Transparente dataset downloads.
//!
//! The classifier itself never touches the network; this module is the
//! provider collaborator that hands it a raw CSV table. Two entry points:
//!
//! - [`TesouroClient::fetch_rates`] downloads the taxas CSV into memory for
//!   a direct classification run (`tdc classify --fetch`)
//! - [`TesouroClient::download_all`] saves a batch of datasets to disk in
//!   parallel, reporting one outcome per dataset; a failed download never
//!   aborts the rest of the batch

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use rayon::prelude::*;
use reqwest::blocking::Client;

use crate::error::{AppError, ErrorKind};

/// The public Tesouro Direto datasets, keyed by their CKAN CSV resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dataset {
    /// Outstanding stock per security.
    Estoque,
    /// Primary sales.
    Vendas,
    /// Daily prices and rates (the classifier's input).
    Taxas,
    /// Buy/sell operations.
    Operacoes,
    /// Investor registrations.
    Investidores,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::Estoque,
        Dataset::Vendas,
        Dataset::Taxas,
        Dataset::Operacoes,
        Dataset::Investidores,
    ];

    pub fn url(self) -> &'static str {
        match self {
            Dataset::Estoque => "https://www.tesourotransparente.gov.br/ckan/dataset/4d4dac3b-96d2-4011-92c9-ddf7d8392622/resource/650cdc18-0513-4bb1-9222-003ad1c11ac7/download/EstoqueTesouroDireto.csv",
            Dataset::Vendas => "https://www.tesourotransparente.gov.br/ckan/dataset/f0468ecc-ae97-4287-89c2-6d8139fb4343/resource/e5f90e3a-8f8d-4895-9c56-4bb2f7877920/download/VendasTesouroDireto.csv",
            Dataset::Taxas => "https://www.tesourotransparente.gov.br/ckan/dataset/df56aa42-484a-4a59-8184-7676580c81e3/resource/796d2059-14e9-44e3-80c9-2d9e30b405c1/download/PrecoTaxaTesouroDireto.csv",
            Dataset::Operacoes => "https://www.tesourotransparente.gov.br/ckan/dataset/78739a33-4d2f-4e35-88fd-65f1ccbe81c4/resource/4100d614-d1ad-4b62-9435-84f7943e46f3/download/OperacoesTesouroDireto.csv",
            Dataset::Investidores => "https://www.tesourotransparente.gov.br/ckan/dataset/48a7fd9d-78e5-43cb-bcba-6e7dcaf2d741/resource/0fd2ac86-4673-46c0-a889-b46224ade563/download/InvestidoresTesouroDireto.csv",
        }
    }

    /// Local file name under the fetch output directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Estoque => "estoque.csv",
            Dataset::Vendas => "vendas.csv",
            Dataset::Taxas => "taxas.csv",
            Dataset::Operacoes => "operacoes.csv",
            Dataset::Investidores => "investidores.csv",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Dataset::Estoque => "estoque",
            Dataset::Vendas => "vendas",
            Dataset::Taxas => "taxas",
            Dataset::Operacoes => "operacoes",
            Dataset::Investidores => "investidores",
        }
    }
}

/// Per-dataset result of a batch download.
#[derive(Debug)]
pub struct FetchOutcome {
    pub dataset: Dataset,
    pub result: Result<PathBuf, AppError>,
}

pub struct TesouroClient {
    client: Client,
}

impl TesouroClient {
    pub fn new() -> Result<Self, AppError> {
        // The taxas CSV alone is tens of megabytes; allow a generous timeout.
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| AppError::new(ErrorKind::Network, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download one dataset's CSV into memory.
    pub fn fetch_csv(&self, dataset: Dataset) -> Result<Vec<u8>, AppError> {
        let resp = self.client.get(dataset.url()).send().map_err(|e| {
            AppError::new(
                ErrorKind::Network,
                format!("Download of '{}' failed: {e}", dataset.display_name()),
            )
        })?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                ErrorKind::Network,
                format!(
                    "Download of '{}' failed with status {}.",
                    dataset.display_name(),
                    resp.status()
                ),
            ));
        }

        let bytes = resp.bytes().map_err(|e| {
            AppError::new(
                ErrorKind::Network,
                format!("Download of '{}' was interrupted: {e}", dataset.display_name()),
            )
        })?;
        Ok(bytes.to_vec())
    }

    /// Download the taxas CSV (the classifier's raw table).
    pub fn fetch_rates(&self) -> Result<Vec<u8>, AppError> {
        self.fetch_csv(Dataset::Taxas)
    }

    /// Download a batch of datasets to `out_dir`, one file per dataset.
    ///
    /// Tasks run in parallel and are independent (disjoint output files).
    /// All outcomes are collected and returned after every task finishes;
    /// callers decide how to report partial failure.
    pub fn download_all(&self, out_dir: &Path, datasets: &[Dataset]) -> Vec<FetchOutcome> {
        datasets
            .par_iter()
            .map(|&dataset| FetchOutcome {
                dataset,
                result: self.download_one(out_dir, dataset),
            })
            .collect()
    }

    fn download_one(&self, out_dir: &Path, dataset: Dataset) -> Result<PathBuf, AppError> {
        let bytes = self.fetch_csv(dataset)?;
        let path = out_dir.join(dataset.file_name());
        std::fs::write(&path, &bytes).map_err(|e| {
            AppError::new(
                ErrorKind::Io,
                format!("Failed to write '{}': {e}", path.display()),
            )
        })?;
        Ok(path)
    }
}
