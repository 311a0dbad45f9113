// src/session/sessao.rs
//
// Authenticated facade over the twelve repositories.
//
// Conventions, uniform across all four business areas:
// - get_*   -> AppResult<T>, AppError::NotFound when the key is absent
// - save_*  -> Ok(true) created; Ok(false) the key already exists
// - edit_*  -> Ok(true) updated; Ok(false) nothing to update
// - rem_*   -> Ok(true) removed; Ok(false) nothing to remove
// - Err(_) always means I/O, never a failed precondition
//
// No entity is cached between calls; every operation re-fetches.

use std::sync::Arc;

use super::import::FonteFichas;
use super::Repos;
use crate::domain::{
    Candidatura, Doador, Donativo, Equipa, Evento, Funcionario, Material, Membro, Projeto,
    Representante, Tarefa, Voluntario,
};
use crate::error::{AppError, AppResult};
use crate::repositories::{ChaveSequencial, Repositorio};

/// Case-insensitive substring match; an empty term matches everything.
fn corresponde(texto: &str, termo_lower: &str) -> bool {
    texto.to_lowercase().contains(termo_lower)
}

pub struct Sessao {
    repos: Arc<Repos>,
    funcionario: Funcionario,
}

impl Sessao {
    pub(crate) fn new(repos: Arc<Repos>, funcionario: Funcionario) -> Self {
        Self { repos, funcionario }
    }

    /// End the session. Consumes the handle, so a closed session cannot be
    /// used again; the underlying pool is released when the last clone of
    /// the gateway goes away. Best-effort: process exit without calling
    /// this loses nothing.
    pub fn close(self) {
        log::info!("session closed for {:?}", self.funcionario.username);
    }

    // ======================================================================
    // Doações
    // ======================================================================

    pub fn total_doadores(&self) -> AppResult<usize> {
        self.repos.doadores.count()
    }

    pub fn get_doador(&self, nif: &str) -> AppResult<Doador> {
        self.repos
            .doadores
            .get(&nif.to_string())?
            .ok_or_else(|| AppError::not_found("Doador", nif))
    }

    pub fn doador_existe(&self, nif: &str) -> AppResult<bool> {
        self.repos.doadores.contains(&nif.to_string())
    }

    pub fn save_doador(&self, doador: &Doador) -> AppResult<bool> {
        if self.repos.doadores.contains(&doador.nif)? {
            return Ok(false);
        }
        self.repos.doadores.put(doador)?;
        Ok(true)
    }

    pub fn edit_doador(&self, doador: &Doador) -> AppResult<bool> {
        if !self.repos.doadores.contains(&doador.nif)? {
            return Ok(false);
        }
        self.repos.doadores.put(doador)?;
        Ok(true)
    }

    pub fn rem_doador(&self, nif: &str) -> AppResult<bool> {
        Ok(self.repos.doadores.delete(&nif.to_string())?.is_some())
    }

    /// Total money donated by one donor. In-kind donations contribute
    /// nothing; an unknown donor totals 0.
    pub fn total_doado_por_doador(&self, nif: &str) -> AppResult<f64> {
        if !self.repos.doadores.contains(&nif.to_string())? {
            return Ok(0.0);
        }

        let total = self
            .repos
            .donativos
            .list_do_doador(nif)?
            .iter()
            .filter_map(Donativo::valor_monetario)
            .sum();

        Ok(total)
    }

    pub fn total_donativos(&self) -> AppResult<usize> {
        self.repos.donativos.count()
    }

    pub fn get_donativo(&self, nr_recibo: i64) -> AppResult<Donativo> {
        self.repos
            .donativos
            .get(&nr_recibo)?
            .ok_or_else(|| AppError::not_found("Donativo", nr_recibo))
    }

    pub fn donativo_existe(&self, nr_recibo: i64) -> AppResult<bool> {
        self.repos.donativos.contains(&nr_recibo)
    }

    pub fn save_donativo(&self, donativo: &Donativo) -> AppResult<bool> {
        if self.repos.donativos.contains(&donativo.nr_recibo)? {
            return Ok(false);
        }
        self.repos.donativos.put(donativo)?;
        Ok(true)
    }

    pub fn edit_donativo(&self, donativo: &Donativo) -> AppResult<bool> {
        if !self.repos.donativos.contains(&donativo.nr_recibo)? {
            return Ok(false);
        }
        self.repos.donativos.put(donativo)?;
        Ok(true)
    }

    pub fn rem_donativo(&self, nr_recibo: i64) -> AppResult<bool> {
        Ok(self.repos.donativos.delete(&nr_recibo)?.is_some())
    }

    pub fn generate_donativo_key(&self) -> AppResult<i64> {
        self.repos.donativos.next_key()
    }

    pub fn total_eventos(&self) -> AppResult<usize> {
        self.repos.eventos.count()
    }

    pub fn get_evento(&self, nr: i64) -> AppResult<Evento> {
        self.repos
            .eventos
            .get(&nr)?
            .ok_or_else(|| AppError::not_found("Evento", nr))
    }

    pub fn evento_existe(&self, nr: i64) -> AppResult<bool> {
        self.repos.eventos.contains(&nr)
    }

    pub fn save_evento(&self, evento: &Evento) -> AppResult<bool> {
        if self.repos.eventos.contains(&evento.nr)? {
            return Ok(false);
        }
        self.repos.eventos.put(evento)?;
        Ok(true)
    }

    pub fn edit_evento(&self, evento: &Evento) -> AppResult<bool> {
        if !self.repos.eventos.contains(&evento.nr)? {
            return Ok(false);
        }
        self.repos.eventos.put(evento)?;
        Ok(true)
    }

    pub fn rem_evento(&self, nr: i64) -> AppResult<bool> {
        Ok(self.repos.eventos.delete(&nr)?.is_some())
    }

    pub fn generate_evento_key(&self) -> AppResult<i64> {
        self.repos.eventos.next_key()
    }

    // ======================================================================
    // Projetos
    // ======================================================================

    pub fn total_projetos(&self) -> AppResult<usize> {
        self.repos.projetos.count()
    }

    pub fn get_projeto(&self, nr: i64) -> AppResult<Projeto> {
        self.repos
            .projetos
            .get(&nr)?
            .ok_or_else(|| AppError::not_found("Projeto", nr))
    }

    pub fn projeto_existe(&self, nr: i64) -> AppResult<bool> {
        self.repos.projetos.contains(&nr)
    }

    pub fn save_projeto(&self, projeto: &Projeto) -> AppResult<bool> {
        if self.repos.projetos.contains(&projeto.nr)? {
            return Ok(false);
        }
        self.repos.projetos.put(projeto)?;
        Ok(true)
    }

    pub fn edit_projeto(&self, projeto: &Projeto) -> AppResult<bool> {
        if !self.repos.projetos.contains(&projeto.nr)? {
            return Ok(false);
        }
        self.repos.projetos.put(projeto)?;
        Ok(true)
    }

    pub fn rem_projeto(&self, nr: i64) -> AppResult<bool> {
        Ok(self.repos.projetos.delete(&nr)?.is_some())
    }

    pub fn generate_projeto_key(&self) -> AppResult<i64> {
        self.repos.projetos.next_key()
    }

    pub fn tarefas_do_projeto(&self, nr: i64) -> AppResult<Vec<Tarefa>> {
        self.repos.tarefas.list_do_projeto(nr)
    }

    pub fn total_materiais(&self) -> AppResult<usize> {
        self.repos.materiais.count()
    }

    pub fn get_material(&self, id: i64) -> AppResult<Material> {
        self.repos
            .materiais
            .get(&id)?
            .ok_or_else(|| AppError::not_found("Material", id))
    }

    pub fn material_existe(&self, id: i64) -> AppResult<bool> {
        self.repos.materiais.contains(&id)
    }

    pub fn save_material(&self, material: &Material) -> AppResult<bool> {
        if self.repos.materiais.contains(&material.id)? {
            return Ok(false);
        }
        self.repos.materiais.put(material)?;
        Ok(true)
    }

    pub fn edit_material(&self, material: &Material) -> AppResult<bool> {
        if !self.repos.materiais.contains(&material.id)? {
            return Ok(false);
        }
        self.repos.materiais.put(material)?;
        Ok(true)
    }

    pub fn rem_material(&self, id: i64) -> AppResult<bool> {
        Ok(self.repos.materiais.delete(&id)?.is_some())
    }

    /// Materials whose name contains the term, case-insensitively.
    pub fn search_material(&self, termo: &str) -> AppResult<Vec<Material>> {
        let termo = termo.trim().to_lowercase();
        let mut encontrados = self.repos.materiais.list()?;
        encontrados.retain(|m| corresponde(&m.nome, &termo));
        Ok(encontrados)
    }

    pub fn generate_material_key(&self) -> AppResult<i64> {
        self.repos.materiais.next_key()
    }

    pub fn total_tarefas(&self) -> AppResult<usize> {
        self.repos.tarefas.count()
    }

    pub fn get_tarefa(&self, id: i64) -> AppResult<Tarefa> {
        self.repos
            .tarefas
            .get(&id)?
            .ok_or_else(|| AppError::not_found("Tarefa", id))
    }

    pub fn tarefa_existe(&self, id: i64) -> AppResult<bool> {
        self.repos.tarefas.contains(&id)
    }

    pub fn save_tarefa(&self, tarefa: &Tarefa) -> AppResult<bool> {
        if self.repos.tarefas.contains(&tarefa.id)? {
            return Ok(false);
        }
        self.repos.tarefas.put(tarefa)?;
        Ok(true)
    }

    pub fn edit_tarefa(&self, tarefa: &Tarefa) -> AppResult<bool> {
        if !self.repos.tarefas.contains(&tarefa.id)? {
            return Ok(false);
        }
        self.repos.tarefas.put(tarefa)?;
        Ok(true)
    }

    pub fn rem_tarefa(&self, id: i64) -> AppResult<bool> {
        Ok(self.repos.tarefas.delete(&id)?.is_some())
    }

    /// Tasks whose designation contains the term, case-insensitively.
    pub fn search_tarefa(&self, termo: &str) -> AppResult<Vec<Tarefa>> {
        let termo = termo.trim().to_lowercase();
        let mut encontradas = self.repos.tarefas.list()?;
        encontradas.retain(|t| corresponde(&t.designacao, &termo));
        Ok(encontradas)
    }

    pub fn generate_tarefa_key(&self) -> AppResult<i64> {
        self.repos.tarefas.next_key()
    }

    // ======================================================================
    // Famílias
    // ======================================================================

    pub fn total_candidaturas(&self) -> AppResult<usize> {
        self.repos.candidaturas.count()
    }

    pub fn get_candidatura(&self, nr: i64) -> AppResult<Candidatura> {
        self.repos
            .candidaturas
            .get(&nr)?
            .ok_or_else(|| AppError::not_found("Candidatura", nr))
    }

    pub fn candidatura_existe(&self, nr: i64) -> AppResult<bool> {
        self.repos.candidaturas.contains(&nr)
    }

    pub fn save_candidatura(&self, candidatura: &Candidatura) -> AppResult<bool> {
        if self.repos.candidaturas.contains(&candidatura.nr)? {
            return Ok(false);
        }
        self.repos.candidaturas.put(candidatura)?;
        Ok(true)
    }

    pub fn edit_candidatura(&self, candidatura: &Candidatura) -> AppResult<bool> {
        if !self.repos.candidaturas.contains(&candidatura.nr)? {
            return Ok(false);
        }
        self.repos.candidaturas.put(candidatura)?;
        Ok(true)
    }

    pub fn rem_candidatura(&self, nr: i64) -> AppResult<bool> {
        Ok(self.repos.candidaturas.delete(&nr)?.is_some())
    }

    /// Applications whose description contains the term, case-insensitively.
    pub fn search_candidatura(&self, termo: &str) -> AppResult<Vec<Candidatura>> {
        let termo = termo.trim().to_lowercase();
        let mut encontradas = self.repos.candidaturas.list()?;
        encontradas.retain(|c| corresponde(&c.descricao, &termo));
        Ok(encontradas)
    }

    pub fn generate_candidatura_key(&self) -> AppResult<i64> {
        self.repos.candidaturas.next_key()
    }

    pub fn total_membros(&self) -> AppResult<usize> {
        self.repos.membros.count()
    }

    pub fn get_membro(&self, id: i64) -> AppResult<Membro> {
        self.repos
            .membros
            .get(&id)?
            .ok_or_else(|| AppError::not_found("Membro", id))
    }

    pub fn membro_existe(&self, id: i64) -> AppResult<bool> {
        self.repos.membros.contains(&id)
    }

    pub fn save_membro(&self, membro: &Membro) -> AppResult<bool> {
        if self.repos.membros.contains(&membro.id)? {
            return Ok(false);
        }
        self.repos.membros.put(membro)?;
        Ok(true)
    }

    pub fn edit_membro(&self, membro: &Membro) -> AppResult<bool> {
        if !self.repos.membros.contains(&membro.id)? {
            return Ok(false);
        }
        self.repos.membros.put(membro)?;
        Ok(true)
    }

    pub fn rem_membro(&self, id: i64) -> AppResult<bool> {
        Ok(self.repos.membros.delete(&id)?.is_some())
    }

    /// Members whose name contains the term, case-insensitively.
    pub fn search_membro(&self, termo: &str) -> AppResult<Vec<Membro>> {
        let termo = termo.trim().to_lowercase();
        let mut encontrados = self.repos.membros.list()?;
        encontrados.retain(|m| corresponde(&m.nome, &termo));
        Ok(encontrados)
    }

    pub fn membros_da_candidatura(&self, nr: i64) -> AppResult<Vec<Membro>> {
        self.repos.membros.list_da_candidatura(nr)
    }

    pub fn generate_membro_key(&self) -> AppResult<i64> {
        self.repos.membros.next_key()
    }

    pub fn total_representantes(&self) -> AppResult<usize> {
        self.repos.representantes.count()
    }

    pub fn get_representante(&self, nr: i64) -> AppResult<Representante> {
        self.repos
            .representantes
            .get(&nr)?
            .ok_or_else(|| AppError::not_found("Representante", nr))
    }

    pub fn representante_existe(&self, nr: i64) -> AppResult<bool> {
        self.repos.representantes.contains(&nr)
    }

    pub fn save_representante(&self, representante: &Representante) -> AppResult<bool> {
        if self.repos.representantes.contains(&representante.nr)? {
            return Ok(false);
        }
        self.repos.representantes.put(representante)?;
        Ok(true)
    }

    pub fn edit_representante(&self, representante: &Representante) -> AppResult<bool> {
        if !self.repos.representantes.contains(&representante.nr)? {
            return Ok(false);
        }
        self.repos.representantes.put(representante)?;
        Ok(true)
    }

    pub fn rem_representante(&self, nr: i64) -> AppResult<bool> {
        Ok(self.repos.representantes.delete(&nr)?.is_some())
    }

    /// Representatives whose name contains the term, case-insensitively.
    pub fn search_representante(&self, termo: &str) -> AppResult<Vec<Representante>> {
        let termo = termo.trim().to_lowercase();
        let mut encontrados = self.repos.representantes.list()?;
        encontrados.retain(|r| corresponde(&r.nome, &termo));
        Ok(encontrados)
    }

    pub fn generate_representante_key(&self) -> AppResult<i64> {
        self.repos.representantes.next_key()
    }

    // ======================================================================
    // Recursos humanos
    // ======================================================================

    pub fn total_voluntarios(&self) -> AppResult<usize> {
        self.repos.voluntarios.count()
    }

    pub fn voluntarios_is_empty(&self) -> AppResult<bool> {
        self.repos.voluntarios.is_empty()
    }

    pub fn get_voluntario(&self, nr: i64) -> AppResult<Voluntario> {
        self.repos
            .voluntarios
            .get(&nr)?
            .ok_or_else(|| AppError::not_found("Voluntario", nr))
    }

    pub fn voluntario_existe(&self, nr: i64) -> AppResult<bool> {
        self.repos.voluntarios.contains(&nr)
    }

    pub fn save_voluntario(&self, voluntario: &Voluntario) -> AppResult<bool> {
        if self.repos.voluntarios.contains(&voluntario.nr)? {
            return Ok(false);
        }
        self.repos.voluntarios.put(voluntario)?;
        Ok(true)
    }

    pub fn edit_voluntario(&self, voluntario: &Voluntario) -> AppResult<bool> {
        if !self.repos.voluntarios.contains(&voluntario.nr)? {
            return Ok(false);
        }
        self.repos.voluntarios.put(voluntario)?;
        Ok(true)
    }

    pub fn rem_voluntario(&self, nr: i64) -> AppResult<bool> {
        Ok(self.repos.voluntarios.delete(&nr)?.is_some())
    }

    /// Volunteers whose name contains the term, case-insensitively.
    pub fn search_voluntario(&self, termo: &str) -> AppResult<Vec<Voluntario>> {
        let termo = termo.trim().to_lowercase();
        let mut encontrados = self.repos.voluntarios.list()?;
        encontrados.retain(|v| corresponde(&v.nome, &termo));
        Ok(encontrados)
    }

    pub fn generate_voluntario_key(&self) -> AppResult<i64> {
        self.repos.voluntarios.next_key()
    }

    pub fn voluntarios(&self) -> AppResult<Vec<Voluntario>> {
        self.repos.voluntarios.list()
    }

    pub fn voluntarios_keys(&self) -> AppResult<Vec<i64>> {
        self.repos.voluntarios.keys()
    }

    /// Register volunteering hours against a project.
    ///
    /// The one referential precondition enforced above the store: when the
    /// project does not exist this is a no-op returning `Ok(false)` and no
    /// hours are recorded anywhere.
    pub fn add_horas_voluntariado(
        &self,
        projeto: i64,
        voluntario: i64,
        horas: i64,
    ) -> AppResult<bool> {
        if !self.repos.projetos.contains(&projeto)? {
            log::warn!(
                "hours for volunteer {} rejected: project {} does not exist",
                voluntario,
                projeto
            );
            return Ok(false);
        }
        self.repos.voluntarios.add_horas(projeto, voluntario, horas)?;
        Ok(true)
    }

    /// Bulk-save volunteers coming from the sheet importer.
    ///
    /// Reserves a fresh key for each sheet and returns the assigned keys in
    /// source order.
    pub fn importar_voluntarios(&self, fonte: &mut dyn FonteFichas) -> AppResult<Vec<i64>> {
        let mut atribuidos = Vec::new();

        while let Some(ficha) = fonte.proxima()? {
            let nr = self.repos.voluntarios.next_key()?;
            let mut voluntario = Voluntario::new(nr, ficha.nome, ficha.contacto);
            voluntario.data_nascimento = ficha.data_nascimento;
            voluntario.linguas = ficha.linguas;

            self.repos.voluntarios.put(&voluntario)?;
            atribuidos.push(nr);
        }

        log::info!("imported {} volunteer sheet(s)", atribuidos.len());
        Ok(atribuidos)
    }

    pub fn total_equipas(&self) -> AppResult<usize> {
        self.repos.equipas.count()
    }

    pub fn get_equipa(&self, id: i64) -> AppResult<Equipa> {
        self.repos
            .equipas
            .get(&id)?
            .ok_or_else(|| AppError::not_found("Equipa", id))
    }

    pub fn equipa_existe(&self, id: i64) -> AppResult<bool> {
        self.repos.equipas.contains(&id)
    }

    pub fn save_equipa(&self, equipa: &Equipa) -> AppResult<bool> {
        if self.repos.equipas.contains(&equipa.id)? {
            return Ok(false);
        }
        self.repos.equipas.put(equipa)?;
        Ok(true)
    }

    pub fn edit_equipa(&self, equipa: &Equipa) -> AppResult<bool> {
        if !self.repos.equipas.contains(&equipa.id)? {
            return Ok(false);
        }
        self.repos.equipas.put(equipa)?;
        Ok(true)
    }

    pub fn rem_equipa(&self, id: i64) -> AppResult<bool> {
        Ok(self.repos.equipas.delete(&id)?.is_some())
    }

    /// Teams whose country of origin contains the term, case-insensitively.
    pub fn search_equipa(&self, termo: &str) -> AppResult<Vec<Equipa>> {
        let termo = termo.trim().to_lowercase();
        let mut encontradas = self.repos.equipas.list()?;
        encontradas.retain(|e| corresponde(&e.pais_origem, &termo));
        Ok(encontradas)
    }

    pub fn generate_equipa_key(&self) -> AppResult<i64> {
        self.repos.equipas.next_key()
    }

    pub fn voluntarios_da_equipa(&self, id: i64) -> AppResult<Vec<Voluntario>> {
        self.repos.voluntarios.list_por_equipa(Some(id))
    }

    pub fn voluntarios_sem_equipa(&self) -> AppResult<Vec<Voluntario>> {
        self.repos.voluntarios.list_por_equipa(None)
    }

    /// First and last name of a team's leader.
    ///
    /// Surfaces NotFound either for a missing team or for a leader that was
    /// removed and left the team's `chefe` dangling.
    pub fn nome_chefe_equipa(&self, id: i64) -> AppResult<String> {
        let equipa = self.get_equipa(id)?;
        let chefe = self.get_voluntario(equipa.chefe)?;
        Ok(chefe.nome_curto())
    }

    pub fn get_funcionario(&self, username: &str) -> AppResult<Funcionario> {
        self.repos
            .funcionarios
            .get(&username.to_string())?
            .ok_or_else(|| AppError::not_found("Funcionario", username))
    }

    /// The staff member this session was opened for.
    pub fn funcionario_autenticado(&self) -> &Funcionario {
        &self.funcionario
    }

    pub fn username(&self) -> &str {
        &self.funcionario.username
    }

    pub fn funcionario_nome_curto(&self) -> String {
        self.funcionario.nome_curto()
    }

    pub fn tem_permissoes(&self, pedidas: &[String]) -> bool {
        self.funcionario.tem_permissoes(pedidas)
    }
}
